//! Domain types shared across modules.

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Maximum label length, in characters.
pub const LABEL_MAX_CHARS: usize = 30;

/// Tag that makes an item require a base contract.
pub const DEFAULT_CONTRACT_TAG: &str = "luxmed";

pub const DEFAULT_ITEM_COUNT: usize = 6;

pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";

/// One of the three selectable facets of an item, named by position.
///
/// Declaration order is the rendering order, so a `BTreeSet<Slot>` always
/// iterates left, mid, right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// Description
    Left,
    /// Link
    Mid,
    /// File
    Right,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Left, Slot::Mid, Slot::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Left => "left",
            Slot::Mid => "mid",
            Slot::Right => "right",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "description" | "desc" => Ok(Slot::Left),
            "mid" | "link" => Ok(Slot::Mid),
            "right" | "file" => Ok(Slot::Right),
            other => bail!("Invalid slot '{other}' (expected left|mid|right)"),
        }
    }
}

/// Presentation color of an item card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemColor {
    #[default]
    Blue,
    Green,
    Amber,
}

impl ItemColor {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemColor::Blue => "blue",
            ItemColor::Green => "green",
            ItemColor::Amber => "amber",
        }
    }
}

impl FromStr for ItemColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(ItemColor::Blue),
            "green" => Ok(ItemColor::Green),
            "amber" => Ok(ItemColor::Amber),
            other => bail!("Invalid color '{other}' (expected blue|green|amber)"),
        }
    }
}

/// Free-text item fields settable through the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Label,
    Description,
    Link,
    FileName,
}

impl FromStr for ItemField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "label" => Ok(ItemField::Label),
            "description" | "desc" => Ok(ItemField::Description),
            "link" | "url" => Ok(ItemField::Link),
            "file-name" | "filename" => Ok(ItemField::FileName),
            other => bail!("Invalid field '{other}' (expected label|description|link|file-name)"),
        }
    }
}

/// Whether the user is editing item cards or picking what goes into the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Selecting,
    Editing,
}

/// A user-curated entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    #[serde(deserialize_with = "deserialize_label")]
    label: String,
    pub description: String,
    pub link: String,
    pub file_name: String,
    pub file_id: Option<String>,
    pub color: ItemColor,
    pub selected_slots: BTreeSet<Slot>,
    pub tags: Vec<String>,
    pub has_base_contract: bool,
    pub base_contract_ref: Option<usize>,
}

impl Item {
    pub fn with_label(label: &str) -> Self {
        let mut item = Self::default();
        item.set_label(label);
        item
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Store `value`, silently truncated to [`LABEL_MAX_CHARS`].
    pub fn set_label(&mut self, value: &str) {
        self.label = truncate_label(value);
    }

    pub fn is_selected(&self) -> bool {
        !self.selected_slots.is_empty()
    }

    pub fn has_slot(&self, slot: Slot) -> bool {
        self.selected_slots.contains(&slot)
    }

    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().to_lowercase();
        self.tags.iter().any(|t| t.trim().to_lowercase() == wanted)
    }

    pub fn selected_slot_names(&self) -> Vec<&'static str> {
        self.selected_slots.iter().map(|s| s.as_str()).collect()
    }
}

pub fn truncate_label(value: &str) -> String {
    value.chars().take(LABEL_MAX_CHARS).collect()
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(truncate_label(&raw))
}

/// A persisted upload. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFile {
    pub id: String,
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl SavedFile {
    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn sha256(&self) -> String {
        format!("{:x}", Sha256::digest(&self.content))
    }
}

/// A named, immutable snapshot of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPackage {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// 0-based item indices, in collection order.
    pub selected_indices: Vec<usize>,
    pub generated_text: String,
    pub file_ids: Vec<String>,
}

/// Bundle serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleFormat {
    Zip,
    Json,
}

impl BundleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            BundleFormat::Zip => "zip",
            BundleFormat::Json => "json",
        }
    }
}

/// Storage medium behind the repositories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key in the data directory
    #[default]
    Dir,
    /// Key-value table in an embedded SQLite database
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dir" | "json" => Ok(StorageBackend::Dir),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => bail!("Invalid storage backend '{other}' (expected dir|sqlite)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding persisted repositories; platform data dir when unset.
    pub data_dir: Option<PathBuf>,
    pub storage: StorageBackend,
    pub item_count: usize,
    /// Prefer zip archives over the JSON bundle.
    pub archive_bundles: bool,
    pub output_dir: PathBuf,
    pub contract_tag: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage: StorageBackend::default(),
            item_count: DEFAULT_ITEM_COUNT,
            archive_bundles: true,
            output_dir: PathBuf::from("."),
            contract_tag: DEFAULT_CONTRACT_TAG.to_string(),
        }
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(serde::de::Error::custom)
    }
}
