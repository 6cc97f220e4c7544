//! Shared CLI utilities.

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, IsTerminal, Write};
use std::path::{Path, PathBuf};

use super::GlobalArgs;
use crate::config::{load_config, merge_cli_with_config, resolve_data_dir, CliOverrides};
use crate::domain::{Config, StorageBackend};
use crate::storage::open_store;
use crate::utils::sanitize_file_name;
use crate::workbench::{Workbench, WorkbenchOptions};

/// Resolved configuration plus the workbench it opened.
pub struct Session {
    pub config: Config,
    pub workbench: Workbench,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed reading current directory")?;
        let file_config = load_config(&cwd, global.config.as_deref())?;

        let storage = global.storage.as_deref().map(str::parse::<StorageBackend>).transpose()?;
        let overrides = CliOverrides {
            data_dir: global.data_dir.clone(),
            storage,
            output_dir: global.output_dir.clone(),
            json_bundles: global.json_bundles,
        };
        let config = merge_cli_with_config(file_config, &overrides)?;

        let data_dir = resolve_data_dir(&config)?;
        let store = open_store(&config, &data_dir)?;
        let workbench = Workbench::open(store, WorkbenchOptions::from(&config));
        Ok(Self { config, workbench })
    }

    /// Output directory: the explicit `--out` or the configured one.
    pub fn output_dir(&self, out: Option<&Path>) -> PathBuf {
        out.map(Path::to_path_buf).unwrap_or_else(|| self.config.output_dir.clone())
    }
}

/// Parse a 1-based item number into a 0-based index.
pub fn parse_item_number(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{value}' is not an item number (1, 2, ...)")),
    }
}

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.
pub fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

/// Resolve a full id or a unique prefix of one.
pub fn resolve_id<'a, I>(ids: I, wanted: &str, kind: &str) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted = wanted.trim();
    let mut matches = Vec::new();
    for id in ids {
        if id == wanted {
            return Ok(id.to_string());
        }
        if !wanted.is_empty() && id.starts_with(wanted) {
            matches.push(id);
        }
    }
    match matches.as_slice() {
        [single] => Ok((*single).to_string()),
        [] => anyhow::bail!("No {kind} matches '{wanted}'"),
        _ => anyhow::bail!("'{wanted}' matches {} {kind}s; use a longer prefix", matches.len()),
    }
}

/// Upper bound on ` (n)` suffixes tried before giving up.
const MAX_NAME_ATTEMPTS: usize = 1000;

/// Write `bytes` under `dir` using a sanitized `name`.
///
/// Existing files are never replaced: a taken name gets a ` (1)`, ` (2)`, ...
/// suffix before the extension.
pub fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed creating output directory: {}", dir.display()))?;
    let name = sanitize_file_name(name, "download");

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(numbered_name(&name, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(bytes)
                    .with_context(|| format!("Failed writing {}", path.display()))?;
                if attempt > 0 {
                    tracing::debug!("'{}' already exists; wrote {}", name, path.display());
                }
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed creating {}", path.display()));
            }
        }
    }
    anyhow::bail!("No free file name for '{}' in {}", name, dir.display())
}

/// `name` with ` (n)` inserted before the extension; `n == 0` keeps it as is.
fn numbered_name(name: &str, n: usize) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(pos) if pos > 0 => format!("{} ({n}){}", &name[..pos], &name[pos..]),
        _ => format!("{name} ({n})"),
    }
}

/// Ask before a destructive action. Non-interactive sessions need `--yes`.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !(std::io::stdin().is_terminal() && std::io::stdout().is_terminal()) {
        anyhow::bail!("Confirmation required: pass --yes in non-interactive sessions");
    }
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(answer)
}
