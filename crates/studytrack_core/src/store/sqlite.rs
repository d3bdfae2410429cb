//! SQLite-backed state store.
//!
//! # Responsibility
//! - Persist each state section as one JSON row in `state_sections`.
//! - Rebuild the tree through the lenient decoder on load.
//!
//! # Invariants
//! - `save` writes only sections whose `Arc` differs from the last loaded or
//!   saved tree, all inside one transaction.
//! - A section row that is not valid JSON fails the load; malformed records
//!   inside valid JSON are recovered and reported as warnings.

use super::{Store, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::state::decode::decode_tree;
use crate::state::{MalformedEntityWarning, SectionName, StateTree};
use log::{debug, info, warn};
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// State store backed by a migrated SQLite connection.
pub struct SqliteStore {
    conn: Connection,
    baseline: Option<StateTree>,
    load_warnings: Vec<MalformedEntityWarning>,
}

impl SqliteStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            baseline: None,
            load_warnings: Vec::new(),
        }
    }

    /// Warnings raised by the most recent `load`.
    pub fn load_warnings(&self) -> &[MalformedEntityWarning] {
        &self.load_warnings
    }

    /// Underlying connection, for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn read_payloads(&self) -> StoreResult<Vec<(SectionName, Value)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT section, payload FROM state_sections ORDER BY section ASC;")?;
        let mut rows = stmt.query([])?;
        let mut payloads = Vec::new();

        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let raw: String = row.get(1)?;
            let Ok(section) = key.parse::<SectionName>() else {
                warn!("event=store_load module=store status=warn reason=unknown_section section={key}");
                continue;
            };
            let payload =
                serde_json::from_str::<Value>(&raw).map_err(|err| StoreError::Corrupt {
                    section,
                    message: err.to_string(),
                })?;
            payloads.push((section, payload));
        }

        Ok(payloads)
    }
}

impl Store for SqliteStore {
    fn load(&mut self) -> StoreResult<StateTree> {
        let started_at = Instant::now();
        let payloads = match self.read_payloads() {
            Ok(payloads) => payloads,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err);
            }
        };

        let decoded = decode_tree(payloads.iter().map(|(section, payload)| (*section, payload)));
        info!(
            "event=store_load module=store status=ok sections={} warnings={} duration_ms={}",
            payloads.len(),
            decoded.warnings.len(),
            started_at.elapsed().as_millis()
        );

        self.baseline = Some(decoded.value.clone());
        self.load_warnings = decoded.warnings;
        Ok(decoded.value)
    }

    fn save(&mut self, tree: &StateTree) -> StoreResult<()> {
        let started_at = Instant::now();
        let changed = match &self.baseline {
            Some(previous) => tree.changed_sections(previous),
            None => SectionName::ALL.to_vec(),
        };
        if changed.is_empty() {
            debug!("event=store_save module=store status=skipped sections=0");
            return Ok(());
        }

        let updated_at = epoch_millis();
        let tx = self.conn.transaction()?;
        for section in &changed {
            let payload = encode_section(tree, *section)?;
            tx.execute(
                "INSERT INTO state_sections (section, payload, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(section) DO UPDATE SET
                    payload = excluded.payload,
                    updated_at = excluded.updated_at;",
                params![section.as_str(), payload, updated_at],
            )?;
        }
        tx.commit()?;

        self.baseline = Some(tree.clone());
        info!(
            "event=store_save module=store status=ok sections={} duration_ms={}",
            changed.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn encode_section(tree: &StateTree, section: SectionName) -> StoreResult<String> {
    let payload = match section {
        SectionName::Subjects => serde_json::to_string(tree.subjects().as_ref())?,
        SectionName::Notes => serde_json::to_string(tree.notes().as_ref())?,
        SectionName::Syllabus => serde_json::to_string(tree.syllabus().as_ref())?,
        SectionName::Pyq => serde_json::to_string(tree.pyq().as_ref())?,
        SectionName::Attendance => serde_json::to_string(tree.attendance().as_ref())?,
    };
    Ok(payload)
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|elapsed| i64::try_from(elapsed.as_millis()).ok())
        .unwrap_or_default()
}
