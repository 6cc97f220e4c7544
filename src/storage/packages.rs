//! Repository of saved packages.

use super::{commit_json, load_json, KeyValueStore, PACKAGES_KEY};
use crate::domain::SavedPackage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Saved packages, most recently created first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageRepository {
    packages: Vec<SavedPackage>,
}

impl PackageRepository {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let packages: Vec<SavedPackage> = load_json(store, PACKAGES_KEY).unwrap_or_default();
        tracing::debug!("Loaded {} saved packages", packages.len());
        Self { packages }
    }

    pub fn commit(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        commit_json(store, PACKAGES_KEY, &self.packages)
    }

    pub fn insert(&mut self, package: SavedPackage) {
        self.packages.insert(0, package);
    }

    pub fn get(&self, id: &str) -> Option<&SavedPackage> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<SavedPackage> {
        let pos = self.packages.iter().position(|p| p.id == id)?;
        Some(self.packages.remove(pos))
    }

    pub fn list(&self) -> &[SavedPackage] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Build a package snapshot with a fresh id. A blank name is replaced by one
/// derived from `now`.
pub fn new_package(
    name: Option<&str>,
    now: DateTime<Utc>,
    selected_indices: Vec<usize>,
    generated_text: &str,
    file_ids: Vec<String>,
) -> SavedPackage {
    let name = match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => default_package_name(now),
    };
    SavedPackage {
        id: Uuid::new_v4().to_string(),
        name,
        created_at: now,
        selected_indices,
        generated_text: generated_text.to_string(),
        file_ids,
    }
}

pub fn default_package_name(now: DateTime<Utc>) -> String {
    format!("Package {}", now.format("%Y-%m-%d %H:%M:%S"))
}
