//! Shared helpers

pub mod classify;
pub mod paths;

pub use classify::guess_mime_type;
pub use paths::sanitize_file_name;
