//! Core domain logic for studytrack.
//! This crate is the single source of truth for study-progress invariants.

pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod progress;
pub mod search;
pub mod service;
pub mod state;
pub mod status;
pub mod store;

pub use ids::{fallback_id, next_id, IdError, IdGenerator, UuidIdGenerator};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    parse_marks, try_parse_marks, Attendance, Note, PyqItem, Subject, SubjectCode, Syllabus,
    Topic, Unit,
};
pub use progress::{
    attendance_percent, dashboard, pyq_stats, subject_summary, syllabus_progress, unit_progress,
    Dashboard, PyqStats, SubjectSummary, SyllabusProgress, UnitProgress,
};
pub use search::{
    filter_pyqs, parse_tag_input, query_pyqs, search_notes, search_pyqs, FilterKeyError, PyqFilter,
};
pub use service::tracker::{NoteDraft, PyqDraft, TrackerError, TrackerResult, TrackerService};
pub use state::{
    decode_section, Decoded, InvalidSectionError, MalformedEntityWarning, SectionName,
    SectionValue, StateTree, UpdateError, UpdateResult,
};
pub use status::{CyclicStatus, PyqStatus, TopicStatus, UnknownStatusError};
pub use store::{MemoryStore, SqliteStore, Store, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
