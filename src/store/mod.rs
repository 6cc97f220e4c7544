//! In-memory entity store owning the ordered item collection.
//!
//! Index identity is positional: items are created once and never reordered
//! or removed, so `baseContractRef` can be a plain index.

use crate::domain::{Item, ItemColor, ItemField, Slot};
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    items: Vec<Item>,
}

impl EntityStore {
    /// Create a collection of `count` blank items.
    pub fn new(count: usize) -> Self {
        Self { items: vec![Item::default(); count] }
    }

    /// Adopt `items`, padding with blank items or truncating to `count`.
    pub fn with_items(mut items: Vec<Item>, count: usize) -> Self {
        if items.len() != count {
            tracing::debug!("Resizing item collection from {} to {}", items.len(), count);
        }
        items.resize_with(count, Item::default);
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut Item> {
        let len = self.items.len();
        self.items.get_mut(index).ok_or(EngineError::ItemOutOfRange { index, len })
    }

    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(EngineError::ItemOutOfRange { index, len: self.items.len() })
        }
    }

    /// Set a free-text field. Labels are silently truncated to 30 characters.
    pub fn set_field(&mut self, index: usize, field: ItemField, value: &str) -> Result<()> {
        let item = self.item_mut(index)?;
        match field {
            ItemField::Label => item.set_label(value),
            ItemField::Description => item.description = value.to_string(),
            ItemField::Link => item.link = value.to_string(),
            ItemField::FileName => item.file_name = value.to_string(),
        }
        Ok(())
    }

    /// Add `slot` if absent, remove it otherwise. Returns whether it is now selected.
    pub fn toggle_slot(&mut self, index: usize, slot: Slot) -> Result<bool> {
        let item = self.item_mut(index)?;
        let selected = if item.selected_slots.remove(&slot) {
            false
        } else {
            item.selected_slots.insert(slot);
            true
        };
        Ok(selected)
    }

    pub fn set_color(&mut self, index: usize, color: ItemColor) -> Result<()> {
        self.item_mut(index)?.color = color;
        Ok(())
    }

    /// Replace tags, trimming entries and dropping empty ones.
    pub fn set_tags(&mut self, index: usize, tags: Vec<String>) -> Result<()> {
        let item = self.item_mut(index)?;
        item.tags = tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(())
    }

    pub fn set_base_contract(&mut self, index: usize, has_base_contract: bool) -> Result<()> {
        self.item_mut(index)?.has_base_contract = has_base_contract;
        Ok(())
    }

    /// Point at another item whose base contract this one borrows.
    ///
    /// Dangling targets are accepted here; validation rejects them.
    pub fn set_base_contract_ref(&mut self, index: usize, target: Option<usize>) -> Result<()> {
        let len = self.items.len();
        let item = self.item_mut(index)?;
        if let Some(t) = target {
            if t >= len || t == index {
                tracing::warn!(
                    "Item {} references item {} which cannot supply a base contract",
                    index + 1,
                    t + 1
                );
            }
        }
        item.base_contract_ref = target;
        Ok(())
    }

    /// Record an upload result on the item. `file_id` is `None` when the read failed.
    pub fn attach_file(&mut self, index: usize, file_id: Option<String>, file_name: &str) -> Result<()> {
        let item = self.item_mut(index)?;
        item.file_id = file_id;
        item.file_name = file_name.to_string();
        Ok(())
    }

    pub fn detach_file(&mut self, index: usize) -> Result<()> {
        let item = self.item_mut(index)?;
        item.file_id = None;
        item.file_name.clear();
        Ok(())
    }

    /// Empty every selection; labels, text, files and tags are untouched.
    pub fn clear_all_selections(&mut self) {
        for item in &mut self.items {
            item.selected_slots.clear();
        }
    }

    /// Indices of items with at least one selected slot, in collection order.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.items.iter().enumerate().filter(|(_, item)| item.is_selected()).map(|(i, _)| i).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_label_never_exceeds_limit() {
        let mut store = EntityStore::new(2);
        for len in [0usize, 29, 30, 31, 120] {
            store.set_field(0, ItemField::Label, &"q".repeat(len)).expect("set");
            assert!(store.get(0).expect("item").label().chars().count() <= 30);
        }
    }

    #[test]
    fn toggle_slot_twice_restores_selection() {
        let mut store = EntityStore::new(1);
        store.toggle_slot(0, Slot::Mid).expect("toggle");
        let before = store.get(0).expect("item").selected_slots.clone();

        for slot in Slot::ALL {
            assert!(store.toggle_slot(0, slot).is_ok());
            store.toggle_slot(0, slot).expect("toggle back");
            assert_eq!(store.get(0).expect("item").selected_slots, before);
        }
    }

    #[test]
    fn toggle_is_multi_select() {
        let mut store = EntityStore::new(1);
        assert!(store.toggle_slot(0, Slot::Left).expect("toggle"));
        assert!(store.toggle_slot(0, Slot::Right).expect("toggle"));
        assert_eq!(store.get(0).expect("item").selected_slots.len(), 2);
        assert!(!store.toggle_slot(0, Slot::Left).expect("toggle"));
    }

    #[test]
    fn clear_all_selections_keeps_content() {
        let mut store = EntityStore::new(2);
        store.set_field(1, ItemField::Description, "Opis").expect("set");
        store.set_tags(1, vec!["luxmed".to_string()]).expect("tags");
        store.toggle_slot(1, Slot::Left).expect("toggle");

        store.clear_all_selections();

        let item = store.get(1).expect("item");
        assert!(!item.is_selected());
        assert_eq!(item.description, "Opis");
        assert_eq!(item.tags, vec!["luxmed"]);
    }

    #[test]
    fn out_of_range_mutations_are_rejected() {
        let mut store = EntityStore::new(1);
        let before = store.clone();
        assert!(matches!(
            store.toggle_slot(3, Slot::Left),
            Err(EngineError::ItemOutOfRange { index: 3, len: 1 })
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn selected_indices_follow_collection_order() {
        let mut store = EntityStore::new(4);
        store.toggle_slot(3, Slot::Left).expect("toggle");
        store.toggle_slot(1, Slot::Right).expect("toggle");
        assert_eq!(store.selected_indices(), vec![1, 3]);
    }

    #[test]
    fn with_items_pads_and_truncates() {
        let padded = EntityStore::with_items(vec![Item::with_label("a")], 3);
        assert_eq!(padded.len(), 3);
        assert_eq!(padded.get(0).expect("item").label(), "a");

        let truncated = EntityStore::with_items(vec![Item::default(); 5], 2);
        assert_eq!(truncated.len(), 2);
    }

    #[test]
    fn set_tags_drops_blank_entries() {
        let mut store = EntityStore::new(1);
        store
            .set_tags(0, vec![" luxmed ".to_string(), "".to_string(), "dental".to_string()])
            .expect("tags");
        assert_eq!(store.get(0).expect("item").tags, vec!["luxmed", "dental"]);
    }
}
