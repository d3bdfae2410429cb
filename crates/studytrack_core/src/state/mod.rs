//! Root state tree and the section updater.
//!
//! # Responsibility
//! - Hold every subject-scoped record in five named sections.
//! - Replace one section at a time, producing a new tree value.
//!
//! # Invariants
//! - A tree is never mutated in place; every update returns a new tree.
//! - `update_section` leaves the four untouched sections as the same `Arc`
//!   as the input tree, so callers can detect changes with `Arc::ptr_eq`.
//! - Section values are stored as given; no deep shape validation.

pub mod decode;
pub mod update;

use crate::model::{Attendance, Note, PyqItem, Subject, SubjectCode, Syllabus};
use indexmap::IndexMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

pub use decode::{decode_section, Decoded, MalformedEntityWarning};
pub use update::{UpdateError, UpdateResult};

/// Insertion-ordered per-subject mapping used by every section.
pub type Section<T> = IndexMap<SubjectCode, Arc<T>>;
pub type SubjectsSection = Section<Subject>;
pub type NotesSection = Section<Vec<Note>>;
pub type SyllabusSection = Section<Syllabus>;
pub type PyqSection = Section<Vec<PyqItem>>;
pub type AttendanceSection = Section<Attendance>;

/// Names of the five top-level sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionName {
    Subjects,
    Notes,
    Syllabus,
    Pyq,
    Attendance,
}

impl SectionName {
    /// All sections in persisted order.
    pub const ALL: [SectionName; 5] = [
        Self::Subjects,
        Self::Notes,
        Self::Syllabus,
        Self::Pyq,
        Self::Attendance,
    ];

    /// Stable storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subjects => "subjects",
            Self::Notes => "notes",
            Self::Syllabus => "syllabus",
            Self::Pyq => "pyq",
            Self::Attendance => "attendance",
        }
    }
}

impl Display for SectionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionName {
    type Err = InvalidSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| InvalidSectionError::Unknown(s.to_string()))
    }
}

/// Malformed section-updater call. The tree is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSectionError {
    /// Name is not one of the five sections.
    Unknown(String),
    /// Name is valid but the supplied value belongs to another section.
    Mismatch {
        requested: SectionName,
        provided: SectionName,
    },
}

impl Display for InvalidSectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(name) => write!(f, "unknown state section `{name}`"),
            Self::Mismatch {
                requested,
                provided,
            } => write!(
                f,
                "section value for `{provided}` cannot replace section `{requested}`"
            ),
        }
    }
}

impl Error for InvalidSectionError {}

/// Replacement value for exactly one section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionValue {
    Subjects(Arc<SubjectsSection>),
    Notes(Arc<NotesSection>),
    Syllabus(Arc<SyllabusSection>),
    Pyq(Arc<PyqSection>),
    Attendance(Arc<AttendanceSection>),
}

impl SectionValue {
    /// Section this value belongs to.
    pub fn section(&self) -> SectionName {
        match self {
            Self::Subjects(_) => SectionName::Subjects,
            Self::Notes(_) => SectionName::Notes,
            Self::Syllabus(_) => SectionName::Syllabus,
            Self::Pyq(_) => SectionName::Pyq,
            Self::Attendance(_) => SectionName::Attendance,
        }
    }
}

/// Immutable root aggregate of all tracked data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateTree {
    subjects: Arc<SubjectsSection>,
    notes: Arc<NotesSection>,
    syllabus: Arc<SyllabusSection>,
    pyq: Arc<PyqSection>,
    attendance: Arc<AttendanceSection>,
}

impl StateTree {
    /// Empty tree: every section is an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subjects(&self) -> &Arc<SubjectsSection> {
        &self.subjects
    }

    pub fn notes(&self) -> &Arc<NotesSection> {
        &self.notes
    }

    pub fn syllabus(&self) -> &Arc<SyllabusSection> {
        &self.syllabus
    }

    pub fn pyq(&self) -> &Arc<PyqSection> {
        &self.pyq
    }

    pub fn attendance(&self) -> &Arc<AttendanceSection> {
        &self.attendance
    }

    /// Current value of one section.
    pub fn section(&self, name: SectionName) -> SectionValue {
        match name {
            SectionName::Subjects => SectionValue::Subjects(Arc::clone(&self.subjects)),
            SectionName::Notes => SectionValue::Notes(Arc::clone(&self.notes)),
            SectionName::Syllabus => SectionValue::Syllabus(Arc::clone(&self.syllabus)),
            SectionName::Pyq => SectionValue::Pyq(Arc::clone(&self.pyq)),
            SectionName::Attendance => SectionValue::Attendance(Arc::clone(&self.attendance)),
        }
    }

    /// Whether `name` holds the same allocation in both trees.
    pub fn shares_section(&self, other: &StateTree, name: SectionName) -> bool {
        match name {
            SectionName::Subjects => Arc::ptr_eq(&self.subjects, &other.subjects),
            SectionName::Notes => Arc::ptr_eq(&self.notes, &other.notes),
            SectionName::Syllabus => Arc::ptr_eq(&self.syllabus, &other.syllabus),
            SectionName::Pyq => Arc::ptr_eq(&self.pyq, &other.pyq),
            SectionName::Attendance => Arc::ptr_eq(&self.attendance, &other.attendance),
        }
    }

    /// Sections whose allocation differs from `previous`.
    pub fn changed_sections(&self, previous: &StateTree) -> Vec<SectionName> {
        SectionName::ALL
            .into_iter()
            .filter(|name| !self.shares_section(previous, *name))
            .collect()
    }

    /// Replaces one section by name.
    ///
    /// # Errors
    /// - `InvalidSectionError::Unknown` when `name` is not a section.
    /// - `InvalidSectionError::Mismatch` when `value` belongs to another
    ///   section.
    pub fn update_section(
        &self,
        name: &str,
        value: SectionValue,
    ) -> Result<StateTree, InvalidSectionError> {
        let requested = name.parse::<SectionName>()?;
        let provided = value.section();
        if requested != provided {
            return Err(InvalidSectionError::Mismatch {
                requested,
                provided,
            });
        }
        Ok(self.with_section(value))
    }

    /// Replaces the section that `value` belongs to.
    pub fn with_section(&self, value: SectionValue) -> StateTree {
        let mut next = self.clone();
        match value {
            SectionValue::Subjects(section) => next.subjects = section,
            SectionValue::Notes(section) => next.notes = section,
            SectionValue::Syllabus(section) => next.syllabus = section,
            SectionValue::Pyq(section) => next.pyq = section,
            SectionValue::Attendance(section) => next.attendance = section,
        }
        next
    }

    /// Subject-scoped notes, empty when the subject has none.
    pub fn notes_for(&self, code: &str) -> &[Note] {
        self.notes
            .get(code)
            .map(|notes| notes.as_slice())
            .unwrap_or(&[])
    }

    /// Subject-scoped PYQ items, empty when the subject has none.
    pub fn pyqs_for(&self, code: &str) -> &[PyqItem] {
        self.pyq
            .get(code)
            .map(|items| items.as_slice())
            .unwrap_or(&[])
    }

    pub fn syllabus_for(&self, code: &str) -> Option<&Arc<Syllabus>> {
        self.syllabus.get(code)
    }

    pub fn attendance_for(&self, code: &str) -> Option<&Attendance> {
        self.attendance.get(code).map(|record| record.as_ref())
    }
}
