//! Snapshot of the entity store, so edits survive between CLI invocations.

use super::{commit_json, load_json, KeyValueStore, ITEMS_KEY};
use crate::domain::Item;
use crate::store::EntityStore;
use anyhow::Result;

/// Rehydrate `count` items; missing or corrupt snapshots give blank items.
pub fn load_items(store: &dyn KeyValueStore, count: usize) -> EntityStore {
    let items: Vec<Item> = load_json(store, ITEMS_KEY).unwrap_or_default();
    EntityStore::with_items(items, count)
}

pub fn commit_items(store: &mut dyn KeyValueStore, items: &EntityStore) -> Result<()> {
    commit_json(store, ITEMS_KEY, items.items())
}
