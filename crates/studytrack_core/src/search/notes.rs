//! Note text search.

use super::{contains_folded, needle};
use crate::model::Note;

/// Notes whose title, content or any tag contains `query`.
///
/// An empty query matches every note.
pub fn search_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let Some(needle) = needle(query) else {
        return notes.iter().collect();
    };
    notes
        .iter()
        .filter(|note| note_matches(note, &needle))
        .collect()
}

fn note_matches(note: &Note, needle: &str) -> bool {
    contains_folded(&note.title, needle)
        || contains_folded(&note.content, needle)
        || note.tags.iter().any(|tag| contains_folded(tag, needle))
}
