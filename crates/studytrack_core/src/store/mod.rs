//! Persistence collaborators for the state tree.
//!
//! # Responsibility
//! - Define the load/save contract the tracker service depends on.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - An empty store loads as an empty tree (all sections empty mappings).
//! - Stores persist whole sections; they never patch inside a section.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::db::DbError;
use crate::state::{SectionName, StateTree};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store I/O failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Json(serde_json::Error),
    /// Persisted payload for a section is not valid JSON.
    Corrupt {
        section: SectionName,
        message: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "failed to encode state section: {err}"),
            Self::Corrupt { section, message } => {
                write!(f, "persisted section `{section}` is corrupt: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Corrupt { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Load/save contract for the whole state tree.
pub trait Store {
    /// Loads the persisted tree, or an empty tree when nothing is stored.
    fn load(&mut self) -> StoreResult<StateTree>;
    /// Persists `tree` as the latest committed state.
    fn save(&mut self, tree: &StateTree) -> StoreResult<()>;
}
