//! Cyclic status machines for syllabus topics and PYQ items.
//!
//! # Responsibility
//! - Define the closed status sets for topics and previous-year questions.
//! - Provide the total successor function used by every "tap to advance"
//!   interaction.
//!
//! # Invariants
//! - Each machine is a 3-cycle with no terminal state; `advance` never fails.
//! - The first entry of `CYCLE` is the initial state. Missing or
//!   unrecognized input is read as the initial state.
//! - Wire labels are kebab-case and stable.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Closed status enumeration with a cyclic successor lookup table.
pub trait CyclicStatus: Copy + Eq + Sized + 'static {
    /// States in cycle order. `CYCLE[0]` is the initial state.
    const CYCLE: &'static [Self];
    /// Wire labels, parallel to `CYCLE`.
    const LABELS: &'static [&'static str];

    /// Initial state (also the reading of missing/unknown input).
    fn initial() -> Self {
        Self::CYCLE[0]
    }

    /// Next state in the cycle.
    fn advance(self) -> Self {
        let index = Self::CYCLE
            .iter()
            .position(|state| *state == self)
            .unwrap_or(0);
        Self::CYCLE[(index + 1) % Self::CYCLE.len()]
    }

    /// Stable wire label.
    fn as_str(self) -> &'static str {
        let index = Self::CYCLE
            .iter()
            .position(|state| *state == self)
            .unwrap_or(0);
        Self::LABELS[index]
    }

    /// Strict label lookup.
    fn from_label(label: &str) -> Option<Self> {
        Self::LABELS
            .iter()
            .position(|candidate| *candidate == label)
            .map(|index| Self::CYCLE[index])
    }

    /// Total label lookup: missing or unknown input maps to `initial()`.
    fn parse_lenient(raw: Option<&str>) -> Self {
        raw.and_then(Self::from_label).unwrap_or_else(Self::initial)
    }

    /// Advances from a raw persisted value, normalizing it first.
    fn advance_from(raw: Option<&str>) -> Self {
        Self::parse_lenient(raw).advance()
    }
}

/// Syllabus topic completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl CyclicStatus for TopicStatus {
    const CYCLE: &'static [Self] = &[Self::NotStarted, Self::InProgress, Self::Completed];
    const LABELS: &'static [&'static str] = &["not-started", "in-progress", "completed"];
}

/// PYQ practice state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PyqStatus {
    #[default]
    NotStarted,
    Practiced,
    Mastered,
}

impl CyclicStatus for PyqStatus {
    const CYCLE: &'static [Self] = &[Self::NotStarted, Self::Practiced, Self::Mastered];
    const LABELS: &'static [&'static str] = &["not-started", "practiced", "mastered"];
}

/// Error for strict parsing of an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusError {
    /// Status domain (`topic` or `pyq`).
    pub domain: &'static str,
    /// Rejected input.
    pub value: String,
}

impl Display for UnknownStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} status `{}`", self.domain, self.value)
    }
}

impl Error for UnknownStatusError {}

impl FromStr for TopicStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| UnknownStatusError {
            domain: "topic",
            value: s.to_string(),
        })
    }
}

impl FromStr for PyqStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| UnknownStatusError {
            domain: "pyq",
            value: s.to_string(),
        })
    }
}

impl Display for TopicStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for PyqStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{CyclicStatus, PyqStatus, TopicStatus};

    #[test]
    fn lookup_tables_are_parallel() {
        assert_eq!(TopicStatus::CYCLE.len(), TopicStatus::LABELS.len());
        assert_eq!(PyqStatus::CYCLE.len(), PyqStatus::LABELS.len());
    }

    #[test]
    fn labels_round_trip_through_strict_parse() {
        for status in TopicStatus::CYCLE {
            assert_eq!(status.as_str().parse::<TopicStatus>().unwrap(), *status);
        }
        for status in PyqStatus::CYCLE {
            assert_eq!(status.as_str().parse::<PyqStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn serde_uses_kebab_case_labels() {
        let json = serde_json::to_string(&TopicStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let json = serde_json::to_string(&PyqStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
    }
}
