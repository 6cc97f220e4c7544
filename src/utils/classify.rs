//! File classification helpers for picking a MIME type from a file name.

use std::path::Path;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Guess a MIME type from the file extension.
///
/// # Arguments
/// * `name` - File name or path as supplied by the user
///
/// # Returns
/// A MIME type, or `application/octet-stream` for unknown extensions
pub fn guess_mime_type(name: &str) -> &'static str {
    let ext = Path::new(name).extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" | "text" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "odt" => "application/vnd.oasis.opendocument.text",
        "zip" => "application/zip",
        _ => DEFAULT_MIME_TYPE,
    }
}
