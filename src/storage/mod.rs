//! Durable key-value storage and the repositories persisted through it.
//!
//! Each repository lives under one key as a JSON document. Repositories
//! rehydrate once at start and write their whole contents back on `commit`.

use crate::domain::{Config, StorageBackend};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub mod dir;
pub mod files;
pub mod items;
pub mod memory;
pub mod packages;
pub mod sqlite;

pub use dir::DirStore;
pub use files::FileRepository;
pub use memory::MemoryStore;
pub use packages::PackageRepository;
pub use sqlite::SqliteStore;

pub const FILES_KEY: &str = "files";
pub const PACKAGES_KEY: &str = "packages";
pub const ITEMS_KEY: &str = "items";

/// String-valued key-value medium.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

/// Open the configured backend rooted at `data_dir`.
pub fn open_store(config: &Config, data_dir: &Path) -> Result<Box<dyn KeyValueStore>> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed creating data directory: {}", data_dir.display()))?;

    let store: Box<dyn KeyValueStore> = match config.storage {
        StorageBackend::Dir => Box::new(DirStore::new(data_dir)),
        StorageBackend::Sqlite => Box::new(SqliteStore::open(&data_dir.join(sqlite::DATABASE_FILE))?),
    };
    tracing::debug!("Opened {} storage at {}", store.backend_name(), data_dir.display());
    Ok(store)
}

/// Load a JSON value stored under `key`.
///
/// Missing, unreadable and unparseable values all come back as `None`; a
/// corrupt store is never fatal.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed reading '{}' from {} storage: {:#}", key, store.backend_name(), e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring corrupt '{}' data in {} storage: {}", key, store.backend_name(), e);
            None
        }
    }
}

pub fn commit_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value).with_context(|| format!("Failed serializing '{key}'"))?;
    store.set(key, &raw).with_context(|| format!("Failed persisting '{key}'"))
}
