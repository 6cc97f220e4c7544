//! offer-pack: curate offer items and assemble them into packages
//!
//! Items carry three selectable slots (description, link, file). The current
//! selection renders to plain text, is validated against the base-contract
//! rule, snapshots into packages, and exports as zip archives, JSON bundles
//! or CSV.

pub mod bundle;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod render;
pub mod storage;
pub mod store;
pub mod utils;
pub mod validate;
pub mod workbench;

pub use error::{EngineError, Result, ValidationError};
pub use workbench::{Workbench, WorkbenchOptions};
