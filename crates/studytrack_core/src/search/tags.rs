//! Tag entry normalization.

use std::collections::HashSet;

/// Splits comma-separated tag input.
///
/// Entries are trimmed, blanks dropped, and later duplicates (compared
/// case-insensitively) removed. The first spelling and order are kept.
pub fn parse_tag_input(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .map(str::to_string)
        .collect()
}
