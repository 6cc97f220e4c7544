//! Selection-driven text generation.

use crate::domain::{Item, Slot};

/// Output when no item has a selected slot.
pub const EMPTY_SELECTION_TEXT: &str = "No items selected.";

/// Title used for items with a blank label.
pub const UNTITLED_LABEL: &str = "Untitled";

pub const NONE_PLACEHOLDER: &str = "(none)";

/// Render every selected item as a block, blocks separated by a blank line.
///
/// Output depends only on the items, so repeated calls are byte-identical.
pub fn generate(items: &[Item]) -> String {
    let blocks: Vec<String> = items.iter().filter(|item| item.is_selected()).map(render_block).collect();

    if blocks.is_empty() {
        EMPTY_SELECTION_TEXT.to_string()
    } else {
        blocks.join("\n\n")
    }
}

fn render_block(item: &Item) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(5);
    lines.push(or_fallback(item.label(), UNTITLED_LABEL).to_string());

    let description_emitted = item.has_slot(Slot::Left);
    if description_emitted {
        lines.push(or_fallback(&item.description, NONE_PLACEHOLDER).to_string());
    }

    if item.has_slot(Slot::Mid) {
        if description_emitted {
            lines.push(String::new());
        }
        // Downstream rendering relies on the two-space indent.
        lines.push(format!("  OWU: {}", or_fallback(&item.link, NONE_PLACEHOLDER)));
    }

    if item.has_slot(Slot::Right) {
        lines.push(format!("Plik: {}", or_fallback(&item.file_name, NONE_PLACEHOLDER)));
    }

    lines.join("\n")
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
