//! CSV serialization of the whole item collection.

use crate::domain::Item;

pub const CSV_HEADER: &str = "Index,Label,Description,Link,FileName,SelectedSlots";

/// Joins slot names inside the `SelectedSlots` column.
pub const SLOT_DELIMITER: &str = "|";

/// One row per item, `Index` 1-based. Text fields are always quoted.
pub fn render_csv(items: &[Item]) -> String {
    let mut out = String::with_capacity(64 * (items.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for (index, item) in items.iter().enumerate() {
        let row = [
            (index + 1).to_string(),
            quote(item.label()),
            quote(&item.description),
            quote(&item.link),
            quote(&item.file_name),
            quote(&item.selected_slot_names().join(SLOT_DELIMITER)),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
