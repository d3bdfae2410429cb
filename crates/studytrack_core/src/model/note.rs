//! Free-form study notes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One note attached to a subject.
///
/// # Invariants
/// - `id` is opaque and never reused for another note.
/// - `date` is fixed at creation; edits keep it unchanged.
/// - `tags` keep caller order for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `None` only when persisted data carried an unreadable date.
    pub date: Option<NaiveDate>,
}

impl Note {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags,
            date: Some(date),
        }
    }

    /// Returns an edited copy that keeps `id` and `date`.
    pub fn edited(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: self.id.clone(),
            title: title.into(),
            content: content.into(),
            tags,
            date: self.date,
        }
    }
}
