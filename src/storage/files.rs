//! Repository of uploaded files, independent of any item.

use super::{commit_json, load_json, KeyValueStore, FILES_KEY};
use crate::domain::SavedFile;
use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

/// Saved files, most recently added first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileRepository {
    files: Vec<SavedFile>,
}

impl FileRepository {
    /// Rehydrate from storage; absent or corrupt data yields an empty repository.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let files: Vec<SavedFile> = load_json(store, FILES_KEY).unwrap_or_default();
        tracing::debug!("Loaded {} saved files", files.len());
        Self { files }
    }

    pub fn commit(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        commit_json(store, FILES_KEY, &self.files)
    }

    /// Store an upload and return its freshly generated id.
    pub fn store(&mut self, name: &str, content: Vec<u8>, mime_type: &str) -> String {
        let file = SavedFile {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            content,
            mime_type: mime_type.to_string(),
            created_at: Utc::now(),
        };
        let id = file.id.clone();
        tracing::debug!("Stored file '{}' ({} bytes) as {}", file.name, file.size(), id);
        self.files.insert(0, file);
        id
    }

    pub fn get(&self, id: &str) -> Option<&SavedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: &str) -> Option<SavedFile> {
        let pos = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(pos))
    }

    pub fn list(&self) -> &[SavedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
