//! Path normalization for bundle entries and output files

use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/\\\x00-\x1f]").unwrap());

/// Make `name` usable as a single archive entry or file name.
///
/// Separators and control characters become `_`; names made only of dots
/// (or nothing) fall back to `fallback`.
pub fn sanitize_file_name(name: &str, fallback: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(name.trim(), "_").to_string();
    if cleaned.chars().all(|c| c == '.') {
        fallback.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_are_replaced() {
        assert_eq!(sanitize_file_name("../etc/passwd", "file"), ".._etc_passwd");
        assert_eq!(sanitize_file_name("a\\b.pdf", "file"), "a_b.pdf");
    }

    #[test]
    fn dot_only_names_fall_back() {
        assert_eq!(sanitize_file_name("..", "file"), "file");
        assert_eq!(sanitize_file_name("  ", "package"), "package");
    }

    #[test]
    fn regular_names_are_kept() {
        assert_eq!(sanitize_file_name("Oferta 2026: Złota.txt", "x"), "Oferta 2026: Złota.txt");
    }
}
