//! Directory-backed storage: one `<key>.json` file per key.

use super::KeyValueStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed reading {}", path.display()))?;
        Ok(Some(raw))
    }

    /// Write through a sibling temp file and rename, so readers never see a
    /// half-written document.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed creating {}", self.root.display()))?;
        let path = self.key_path(key);
        let tmp = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).with_context(|| format!("Failed writing {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed replacing {}", path.display()))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "dir"
    }
}
