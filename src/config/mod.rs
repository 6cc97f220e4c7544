//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with proper precedence (CLI > Env > File > Defaults).

pub mod dirs;
pub mod loader;
pub mod merge;

pub use dirs::resolve_data_dir;
pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};
