//! Platform data directory helpers.

use crate::domain::Config;
use anyhow::Result;
use std::path::PathBuf;

const APP_DIR: &str = "offer-pack";

/// The configured data directory, or the platform default.
pub fn resolve_data_dir(config: &Config) -> Result<PathBuf> {
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }
    match data_root_dir() {
        Some(root) => Ok(root.join(APP_DIR)),
        None => anyhow::bail!("Cannot determine a data directory; pass --data-dir"),
    }
}

pub fn data_root_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return Some(PathBuf::from(xdg));
        }
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    }
}
