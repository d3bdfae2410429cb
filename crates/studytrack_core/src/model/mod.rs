//! Study-tracker domain model.
//!
//! # Responsibility
//! - Define the typed records stored in each state tree section.
//! - Keep persisted field names aligned with the stored JSON shape.
//!
//! # Invariants
//! - Every subject-scoped record is keyed by its subject `code`.
//! - Leaf status fields always hold a value from their closed set; missing
//!   values are normalized by the decoder before a record is built.

pub mod note;
pub mod pyq;
pub mod subject;
pub mod syllabus;

pub use note::Note;
pub use pyq::{parse_marks, try_parse_marks, PyqItem};
pub use subject::{Attendance, Subject, SubjectCode};
pub use syllabus::{Syllabus, Topic, Unit};
