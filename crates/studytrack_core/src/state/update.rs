//! Path-copy updates for nested records.
//!
//! # Responsibility
//! - Build a new section value from the current one by copying only the
//!   path root -> subject -> unit -> leaf, then commit it through
//!   `StateTree::with_section`.
//!
//! # Invariants
//! - Sibling subjects, sibling units and untouched sections keep their
//!   `Arc` allocation.
//! - Delete is update-with-omission; removing an absent id returns a tree
//!   that shares every section with the input.
//! - Targets that must already exist (units, topics, PYQ items being
//!   advanced) fail with `UpdateError` and leave the tree untouched.

use super::{Section, SectionValue, StateTree};
use crate::model::{Note, PyqItem, SubjectCode, Syllabus, Topic, Unit};
use crate::status::{CyclicStatus, TopicStatus};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type UpdateResult<T> = Result<T, UpdateError>;

/// Path update target does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    SyllabusNotFound(SubjectCode),
    UnitNotFound {
        code: SubjectCode,
        unit: String,
    },
    TopicNotFound {
        code: SubjectCode,
        unit: String,
        topic_id: String,
    },
    NoteNotFound {
        code: SubjectCode,
        note_id: String,
    },
    PyqNotFound {
        code: SubjectCode,
        pyq_id: String,
    },
}

impl Display for UpdateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SyllabusNotFound(code) => write!(f, "no syllabus for subject `{code}`"),
            Self::UnitNotFound { code, unit } => {
                write!(f, "unit `{unit}` not found in subject `{code}`")
            }
            Self::TopicNotFound {
                code,
                unit,
                topic_id,
            } => write!(
                f,
                "topic `{topic_id}` not found in unit `{unit}` of subject `{code}`"
            ),
            Self::NoteNotFound { code, note_id } => {
                write!(f, "note `{note_id}` not found in subject `{code}`")
            }
            Self::PyqNotFound { code, pyq_id } => {
                write!(f, "pyq item `{pyq_id}` not found in subject `{code}`")
            }
        }
    }
}

impl Error for UpdateError {}

impl StateTree {
    /// Sets one topic's status.
    pub fn set_topic_status(
        &self,
        code: &str,
        unit_name: &str,
        topic_id: &str,
        status: TopicStatus,
    ) -> UpdateResult<StateTree> {
        self.map_topic(code, unit_name, topic_id, |topic| {
            topic.clone().with_status(status)
        })
    }

    /// Advances one topic along `not-started -> in-progress -> completed`.
    pub fn advance_topic(
        &self,
        code: &str,
        unit_name: &str,
        topic_id: &str,
    ) -> UpdateResult<StateTree> {
        self.map_topic(code, unit_name, topic_id, |topic| {
            topic.clone().with_status(topic.status.advance())
        })
    }

    /// Replaces the topic list of an existing unit, keeping its title.
    pub fn replace_unit_topics(
        &self,
        code: &str,
        unit_name: &str,
        topics: Vec<Topic>,
    ) -> UpdateResult<StateTree> {
        let (syllabus, unit) = self.locate_unit(code, unit_name)?;
        let next = Unit::new(unit.title.clone(), topics);
        Ok(self.replace_unit(code, syllabus, unit_name, next))
    }

    /// Inserts or replaces a whole unit, creating the syllabus if needed.
    pub fn insert_unit(&self, code: &str, unit_name: &str, unit: Unit) -> StateTree {
        let empty = Syllabus::new();
        let syllabus = self
            .syllabus()
            .get(code)
            .map(|syllabus| syllabus.as_ref())
            .unwrap_or(&empty);
        self.replace_unit(code, syllabus, unit_name, unit)
    }

    /// Replaces the note with the same id, or appends it.
    pub fn upsert_note(&self, code: &str, note: Note) -> StateTree {
        let mut notes = self.notes_for(code).to_vec();
        match notes.iter().position(|existing| existing.id == note.id) {
            Some(index) => notes[index] = note,
            None => notes.push(note),
        }
        let section = with_entry(self.notes(), code, notes);
        self.with_section(SectionValue::Notes(section))
    }

    /// Drops the note with `note_id` from the subject's notes.
    pub fn remove_note(&self, code: &str, note_id: &str) -> StateTree {
        let notes = self.notes_for(code);
        if !notes.iter().any(|note| note.id == note_id) {
            return self.clone();
        }
        let kept = notes
            .iter()
            .filter(|note| note.id != note_id)
            .cloned()
            .collect();
        let section = with_entry(self.notes(), code, kept);
        self.with_section(SectionValue::Notes(section))
    }

    /// Replaces the PYQ item with the same id, or appends it.
    pub fn upsert_pyq(&self, code: &str, item: PyqItem) -> StateTree {
        let mut items = self.pyqs_for(code).to_vec();
        match items.iter().position(|existing| existing.id == item.id) {
            Some(index) => items[index] = item,
            None => items.push(item),
        }
        let section = with_entry(self.pyq(), code, items);
        self.with_section(SectionValue::Pyq(section))
    }

    /// Advances one item along `not-started -> practiced -> mastered`.
    pub fn advance_pyq(&self, code: &str, pyq_id: &str) -> UpdateResult<StateTree> {
        let items = self.pyqs_for(code);
        let index = items
            .iter()
            .position(|item| item.id == pyq_id)
            .ok_or_else(|| UpdateError::PyqNotFound {
                code: code.to_string(),
                pyq_id: pyq_id.to_string(),
            })?;
        let mut next = items.to_vec();
        next[index].status = next[index].status.advance();
        let section = with_entry(self.pyq(), code, next);
        Ok(self.with_section(SectionValue::Pyq(section)))
    }

    /// Drops the PYQ item with `pyq_id` from the subject's list.
    pub fn remove_pyq(&self, code: &str, pyq_id: &str) -> StateTree {
        let items = self.pyqs_for(code);
        if !items.iter().any(|item| item.id == pyq_id) {
            return self.clone();
        }
        let kept = items
            .iter()
            .filter(|item| item.id != pyq_id)
            .cloned()
            .collect();
        let section = with_entry(self.pyq(), code, kept);
        self.with_section(SectionValue::Pyq(section))
    }

    fn locate_unit(&self, code: &str, unit_name: &str) -> UpdateResult<(&Syllabus, &Arc<Unit>)> {
        let syllabus = self
            .syllabus()
            .get(code)
            .ok_or_else(|| UpdateError::SyllabusNotFound(code.to_string()))?;
        let unit = syllabus
            .unit(unit_name)
            .ok_or_else(|| UpdateError::UnitNotFound {
                code: code.to_string(),
                unit: unit_name.to_string(),
            })?;
        Ok((syllabus.as_ref(), unit))
    }

    fn map_topic(
        &self,
        code: &str,
        unit_name: &str,
        topic_id: &str,
        map: impl FnOnce(&Topic) -> Topic,
    ) -> UpdateResult<StateTree> {
        let (syllabus, unit) = self.locate_unit(code, unit_name)?;
        let index = unit
            .topics
            .iter()
            .position(|topic| topic.id == topic_id)
            .ok_or_else(|| UpdateError::TopicNotFound {
                code: code.to_string(),
                unit: unit_name.to_string(),
                topic_id: topic_id.to_string(),
            })?;

        let mut topics = unit.topics.clone();
        topics[index] = map(&unit.topics[index]);
        let next = Unit::new(unit.title.clone(), topics);
        Ok(self.replace_unit(code, syllabus, unit_name, next))
    }

    fn replace_unit(
        &self,
        code: &str,
        syllabus: &Syllabus,
        unit_name: &str,
        unit: Unit,
    ) -> StateTree {
        let mut next_syllabus = syllabus.clone();
        next_syllabus.insert_unit(unit_name, Arc::new(unit));
        let section = with_entry(self.syllabus(), code, next_syllabus);
        self.with_section(SectionValue::Syllabus(section))
    }
}

/// Copies the section map (sharing every other subject's `Arc`) and
/// replaces or appends the entry for `code`.
fn with_entry<T>(section: &Section<T>, code: &str, value: T) -> Arc<Section<T>> {
    let mut next = section.clone();
    next.insert(code.to_string(), Arc::new(value));
    Arc::new(next)
}

#[cfg(test)]
mod tests {
    use super::UpdateError;
    use crate::model::{Topic, Unit};
    use crate::state::StateTree;
    use crate::status::TopicStatus;

    #[test]
    fn advance_topic_reports_missing_path_segments() {
        let tree = StateTree::new();
        assert_eq!(
            tree.advance_topic("CS101", "unit1", "1").unwrap_err(),
            UpdateError::SyllabusNotFound("CS101".to_string())
        );

        let tree = tree.insert_unit("CS101", "unit1", Unit::new("Basics", vec![]));
        assert!(matches!(
            tree.advance_topic("CS101", "unit9", "1").unwrap_err(),
            UpdateError::UnitNotFound { .. }
        ));
        assert!(matches!(
            tree.advance_topic("CS101", "unit1", "1").unwrap_err(),
            UpdateError::TopicNotFound { .. }
        ));
    }

    #[test]
    fn replace_unit_topics_keeps_title() {
        let tree = StateTree::new().insert_unit("CS101", "unit1", Unit::new("Basics", vec![]));
        let next = tree
            .replace_unit_topics(
                "CS101",
                "unit1",
                vec![Topic::new("1", "Intro").with_status(TopicStatus::Completed)],
            )
            .unwrap();
        let unit = next.syllabus_for("CS101").unwrap().unit("unit1").unwrap().clone();
        assert_eq!(unit.title, "Basics");
        assert_eq!(unit.topics[0].status, TopicStatus::Completed);
    }
}
