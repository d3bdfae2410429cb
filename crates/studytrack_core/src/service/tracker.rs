//! Tracker use-case service.
//!
//! # Responsibility
//! - Sequence user actions: each update derives from the most recently
//!   published tree, then is saved through the store.
//! - Offer note, syllabus and PYQ actions plus derived read views.
//!
//! # Invariants
//! - Updates run one at a time (`&mut self`); there is no staging against
//!   an older snapshot.
//! - An update that changes no section publishes nothing and saves nothing.
//! - A failed save keeps the published tree; the next save writes it.
//! - Logs carry ids and counts only, never note or question text.

use crate::ids::{next_id, IdGenerator, UuidIdGenerator};
use crate::model::{parse_marks, Note, PyqItem};
use crate::progress::{dashboard, subject_summary, Dashboard, SubjectSummary};
use crate::search::{parse_tag_input, query_pyqs, search_notes, PyqFilter};
use crate::state::{InvalidSectionError, SectionValue, StateTree, UpdateError};
use crate::status::{PyqStatus, TopicStatus};
use crate::store::{Store, StoreError};
use chrono::{Local, NaiveDate};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Service error for tracker use-cases.
#[derive(Debug)]
pub enum TrackerError {
    /// Required text input is blank after trim.
    EmptyField(&'static str),
    Section(InvalidSectionError),
    Update(UpdateError),
    Store(StoreError),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be blank"),
            Self::Section(err) => write!(f, "{err}"),
            Self::Update(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyField(_) => None,
            Self::Section(err) => Some(err),
            Self::Update(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<InvalidSectionError> for TrackerError {
    fn from(value: InvalidSectionError) -> Self {
        Self::Section(value)
    }
}

impl From<UpdateError> for TrackerError {
    fn from(value: UpdateError) -> Self {
        Self::Update(value)
    }
}

impl From<StoreError> for TrackerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Caller input for creating or editing a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    /// Sets tags from comma-separated entry text.
    pub fn with_tag_input(mut self, raw: &str) -> Self {
        self.tags = parse_tag_input(raw);
        self
    }
}

/// Caller input for a new PYQ item; `marks` is raw entry text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyqDraft {
    pub question: String,
    pub year: String,
    pub marks: String,
    pub module: String,
}

/// Thin controller owning the current tree and its store.
pub struct TrackerService<S: Store> {
    store: S,
    tree: Arc<StateTree>,
    ids: Box<dyn IdGenerator>,
}

impl<S: Store> TrackerService<S> {
    /// Loads the initial tree from `store`.
    pub fn open(mut store: S) -> TrackerResult<Self> {
        let tree = store.load()?;
        info!(
            "event=tracker_open module=service status=ok subjects={}",
            tree.subjects().len()
        );
        Ok(Self {
            store,
            tree: Arc::new(tree),
            ids: Box::new(UuidIdGenerator),
        })
    }

    /// Replaces the id generator used for new notes and PYQ items.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Current published tree; safe to keep after later updates.
    pub fn tree(&self) -> Arc<StateTree> {
        Arc::clone(&self.tree)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Derives the next tree from the current one, publishes and saves it.
    pub fn apply<F>(&mut self, action: &'static str, update: F) -> TrackerResult<Arc<StateTree>>
    where
        F: FnOnce(&StateTree) -> TrackerResult<StateTree>,
    {
        let next = update(self.tree.as_ref()).map_err(|err| {
            debug!("event=tracker_apply module=service status=rejected action={action} error={err}");
            err
        })?;

        let changed = next.changed_sections(&self.tree);
        if changed.is_empty() {
            debug!("event=tracker_apply module=service status=noop action={action}");
            return Ok(self.tree());
        }

        self.tree = Arc::new(next);
        if let Err(err) = self.store.save(&self.tree) {
            error!(
                "event=tracker_apply module=service status=error action={action} error_code=store_save_failed error={err}"
            );
            return Err(err.into());
        }

        let sections = changed
            .iter()
            .map(|section| section.as_str())
            .collect::<Vec<_>>()
            .join(",");
        info!("event=tracker_apply module=service status=ok action={action} sections={sections}");
        Ok(self.tree())
    }

    /// Replaces one named section wholesale.
    pub fn update_section(
        &mut self,
        name: &str,
        value: SectionValue,
    ) -> TrackerResult<Arc<StateTree>> {
        self.apply("update_section", |tree| Ok(tree.update_section(name, value)?))
    }

    /// Creates a note dated today (local calendar).
    pub fn create_note(&mut self, code: &str, draft: NoteDraft) -> TrackerResult<Note> {
        self.create_note_on(code, draft, Local::now().date_naive())
    }

    /// Creates a note with an explicit creation date.
    pub fn create_note_on(
        &mut self,
        code: &str,
        draft: NoteDraft,
        date: NaiveDate,
    ) -> TrackerResult<Note> {
        let title = required(draft.title, "note title")?;
        let note = Note::new(next_id(self.ids.as_ref()), title, draft.content, draft.tags, date);
        let created = note.clone();
        self.apply("create_note", |tree| Ok(tree.upsert_note(code, note)))?;
        Ok(created)
    }

    /// Rewrites title, content and tags of an existing note.
    pub fn edit_note(&mut self, code: &str, note_id: &str, draft: NoteDraft) -> TrackerResult<Note> {
        let title = required(draft.title, "note title")?;
        let existing = self
            .tree
            .notes_for(code)
            .iter()
            .find(|note| note.id == note_id)
            .ok_or_else(|| UpdateError::NoteNotFound {
                code: code.to_string(),
                note_id: note_id.to_string(),
            })?;
        let edited = existing.edited(title, draft.content, draft.tags);
        let result = edited.clone();
        self.apply("edit_note", |tree| Ok(tree.upsert_note(code, edited)))?;
        Ok(result)
    }

    pub fn delete_note(&mut self, code: &str, note_id: &str) -> TrackerResult<()> {
        self.apply("delete_note", |tree| Ok(tree.remove_note(code, note_id)))?;
        Ok(())
    }

    /// Advances one topic and returns its new status.
    pub fn cycle_topic(
        &mut self,
        code: &str,
        unit_name: &str,
        topic_id: &str,
    ) -> TrackerResult<TopicStatus> {
        let tree = self.apply("cycle_topic", |tree| {
            Ok(tree.advance_topic(code, unit_name, topic_id)?)
        })?;
        let status = tree
            .syllabus_for(code)
            .and_then(|syllabus| syllabus.unit(unit_name))
            .and_then(|unit| unit.topic(topic_id))
            .map(|topic| topic.status)
            .unwrap_or_default();
        Ok(status)
    }

    /// Adds a PYQ item in the `not-started` state.
    pub fn add_pyq(&mut self, code: &str, draft: PyqDraft) -> TrackerResult<PyqItem> {
        let question = required(draft.question, "question")?;
        let item = PyqItem::new(
            next_id(self.ids.as_ref()),
            question,
            draft.year.trim(),
            parse_marks(&draft.marks),
            draft.module.trim(),
        );
        let created = item.clone();
        self.apply("add_pyq", |tree| Ok(tree.upsert_pyq(code, item)))?;
        Ok(created)
    }

    /// Advances one PYQ item and returns its new status.
    pub fn cycle_pyq(&mut self, code: &str, pyq_id: &str) -> TrackerResult<PyqStatus> {
        let tree = self.apply("cycle_pyq", |tree| Ok(tree.advance_pyq(code, pyq_id)?))?;
        let status = tree
            .pyqs_for(code)
            .iter()
            .find(|item| item.id == pyq_id)
            .map(|item| item.status)
            .unwrap_or_default();
        Ok(status)
    }

    pub fn delete_pyq(&mut self, code: &str, pyq_id: &str) -> TrackerResult<()> {
        self.apply("delete_pyq", |tree| Ok(tree.remove_pyq(code, pyq_id)))?;
        Ok(())
    }

    pub fn dashboard(&self) -> Dashboard {
        dashboard(&self.tree)
    }

    pub fn subject_summary(&self, code: &str) -> SubjectSummary {
        subject_summary(&self.tree, code)
    }

    /// Notes of one subject matching `query`.
    pub fn search_notes(&self, code: &str, query: &str) -> Vec<&Note> {
        search_notes(self.tree.notes_for(code), query)
    }

    /// PYQ items of one subject passing `filter` and matching `query`.
    pub fn pyqs(&self, code: &str, filter: PyqFilter, query: &str) -> Vec<&PyqItem> {
        query_pyqs(self.tree.pyqs_for(code), filter, query)
    }
}

fn required(value: String, field: &'static str) -> TrackerResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
