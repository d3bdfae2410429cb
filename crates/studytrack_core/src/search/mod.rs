//! Search and filter views over notes and PYQ collections.
//!
//! # Responsibility
//! - Evaluate text and status predicates on demand over borrowed slices.
//! - Normalize comma-separated tag entry.
//!
//! # Invariants
//! - Views never copy or mutate the collection; results borrow from it and
//!   keep collection order.
//! - Text matching is case-insensitive substring matching.

pub mod notes;
pub mod pyq;
pub mod tags;

pub use notes::search_notes;
pub use pyq::{filter_pyqs, query_pyqs, search_pyqs, FilterKeyError, PyqFilter};
pub use tags::parse_tag_input;

/// Lowercased needle; `None` means "match everything".
fn needle(query: &str) -> Option<String> {
    if query.is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
