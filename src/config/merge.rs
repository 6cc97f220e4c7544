//! Layering of environment variables and CLI flags over file config.

use crate::domain::{Config, StorageBackend};
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "OFFER_PACK_";

/// Settings passed explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub storage: Option<StorageBackend>,
    pub output_dir: Option<PathBuf>,
    pub json_bundles: bool,
}

/// Apply `OFFER_PACK_*` environment variables, then CLI overrides.
pub fn merge_cli_with_config(config: Config, cli: &CliOverrides) -> Result<Config> {
    let mut merged: Config = Figment::from(Serialized::defaults(config))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("Invalid OFFER_PACK_* environment configuration")?;

    apply_cli_overrides(&mut merged, cli);
    Ok(merged)
}

fn apply_cli_overrides(config: &mut Config, cli: &CliOverrides) {
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(storage) = cli.storage {
        config.storage = storage;
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if cli.json_bundles {
        config.archive_bundles = false;
    }
}
