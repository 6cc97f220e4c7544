//! Output rendering (generated text, CSV)

pub mod csv;
pub mod text;

pub use csv::render_csv;
pub use text::{generate, EMPTY_SELECTION_TEXT};
