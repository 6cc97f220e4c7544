//! Engine error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Cross-item rule violation, carrying every offending item number (1-based).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe_failures(.tag, .failing))]
pub struct ValidationError {
    pub tag: String,
    pub failing: Vec<usize>,
}

fn describe_failures(tag: &str, failing: &[usize]) -> String {
    let numbers = failing.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ");
    let (noun, verb) = if failing.len() == 1 { ("Item", "needs") } else { ("Items", "need") };
    format!(
        "{noun} {numbers} tagged \"{tag}\" {verb} a base contract (set it on the item or reference an item that has one)"
    )
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Nothing selected: select at least one slot on an item")]
    NothingSelected,

    #[error("Item {} does not exist (the collection has {len} items)", .index + 1)]
    ItemOutOfRange { index: usize, len: usize },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error("Bundle error: {0:#}")]
    Bundle(anyhow::Error),
}

impl EngineError {
    /// Failing item numbers when this is a validation failure.
    pub fn failing_items(&self) -> Option<&[usize]> {
        match self {
            EngineError::Validation(err) => Some(&err.failing),
            _ => None,
        }
    }
}
