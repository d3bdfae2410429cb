//! Syllabus hierarchy: units of topics, keyed by unit name.
//!
//! # Invariants
//! - Unit iteration order is insertion order and survives every update.
//! - Units are reference counted so an update to one unit leaves sibling
//!   units shared with the previous syllabus value.

use crate::status::TopicStatus;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Smallest trackable syllabus item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Unique within the owning unit.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: TopicStatus,
}

impl Topic {
    /// Creates a topic in the initial `not-started` state.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: TopicStatus::NotStarted,
        }
    }

    pub fn with_status(mut self, status: TopicStatus) -> Self {
        self.status = status;
        self
    }
}

/// Named group of topics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Unit {
    pub title: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl Unit {
    pub fn new(title: impl Into<String>, topics: Vec<Topic>) -> Self {
        Self {
            title: title.into(),
            topics,
        }
    }

    /// Finds a topic by id.
    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.id == topic_id)
    }
}

/// Ordered mapping of unit name to unit for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Syllabus {
    units: IndexMap<String, Arc<Unit>>,
}

impl Syllabus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; replaces in place when the unit name exists.
    pub fn with_unit(mut self, name: impl Into<String>, unit: Unit) -> Self {
        self.insert_unit(name, Arc::new(unit));
        self
    }

    /// Inserts or replaces a unit without disturbing iteration order.
    pub fn insert_unit(&mut self, name: impl Into<String>, unit: Arc<Unit>) {
        self.units.insert(name.into(), unit);
    }

    pub fn unit(&self, name: &str) -> Option<&Arc<Unit>> {
        self.units.get(name)
    }

    /// Units in display order.
    pub fn units(&self) -> impl Iterator<Item = (&str, &Arc<Unit>)> {
        self.units.iter().map(|(name, unit)| (name.as_str(), unit))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
