//! Subject catalogue and attendance records.

use serde::{Deserialize, Serialize};

/// Unique subject key shared by every section.
pub type SubjectCode = String;

/// Catalogue entry for one subject.
///
/// `color` is a presentation hint and is never interpreted by core.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    pub short_name: String,
    pub color: String,
    pub credits: u32,
}

impl Subject {
    pub fn new(name: impl Into<String>, short_name: impl Into<String>, credits: u32) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            color: String::new(),
            credits,
        }
    }
}

/// Per-subject attendance counters.
///
/// # Invariants
/// - `attended <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attendance {
    pub total: u32,
    pub attended: u32,
}

impl Attendance {
    /// Builds a record, clamping `attended` to `total`.
    pub fn new(total: u32, attended: u32) -> Self {
        Self {
            total,
            attended: attended.min(total),
        }
    }

    /// Classes not attended.
    pub fn missed(&self) -> u32 {
        self.total.saturating_sub(self.attended)
    }
}
