//! PYQ status filter and text search.
//!
//! Unknown filter keys are rejected at parse time; a typed `PyqFilter`
//! cannot express one.

use super::{contains_folded, needle};
use crate::model::PyqItem;
use crate::status::PyqStatus;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const FILTER_KEYS: &[&str] = &["all", "not-done", "practiced", "mastered"];

/// Status filter over PYQ items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PyqFilter {
    #[default]
    All,
    /// Items still `not-started`.
    NotDone,
    Practiced,
    Mastered,
}

impl PyqFilter {
    /// Stable filter key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::NotDone => "not-done",
            Self::Practiced => "practiced",
            Self::Mastered => "mastered",
        }
    }

    pub fn matches(self, item: &PyqItem) -> bool {
        match self {
            Self::All => true,
            Self::NotDone => item.status == PyqStatus::NotStarted,
            Self::Practiced => item.status == PyqStatus::Practiced,
            Self::Mastered => item.status == PyqStatus::Mastered,
        }
    }
}

/// Filter key outside `all|not-done|practiced|mastered`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKeyError(pub String);

impl Display for FilterKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown pyq filter `{}`; expected {}",
            self.0,
            FILTER_KEYS.join("|")
        )
    }
}

impl Error for FilterKeyError {}

impl FromStr for PyqFilter {
    type Err = FilterKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "not-done" => Ok(Self::NotDone),
            "practiced" => Ok(Self::Practiced),
            "mastered" => Ok(Self::Mastered),
            other => Err(FilterKeyError(other.to_string())),
        }
    }
}

impl Display for PyqFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn filter_pyqs(items: &[PyqItem], filter: PyqFilter) -> Vec<&PyqItem> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// Items whose question, module or year contains `query`.
pub fn search_pyqs<'a>(items: &'a [PyqItem], query: &str) -> Vec<&'a PyqItem> {
    query_pyqs(items, PyqFilter::All, query)
}

/// Status filter and text search combined.
pub fn query_pyqs<'a>(items: &'a [PyqItem], filter: PyqFilter, query: &str) -> Vec<&'a PyqItem> {
    let needle = needle(query);
    items
        .iter()
        .filter(|item| filter.matches(item))
        .filter(|item| match needle.as_deref() {
            None => true,
            Some(needle) => {
                contains_folded(&item.question, needle)
                    || contains_folded(&item.module, needle)
                    || contains_folded(&item.year, needle)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{PyqFilter, FILTER_KEYS};

    #[test]
    fn every_filter_key_parses_back_to_itself() {
        for key in FILTER_KEYS {
            let filter: PyqFilter = key.parse().unwrap();
            assert_eq!(filter.as_str(), *key);
        }
    }

    #[test]
    fn unknown_and_differently_cased_keys_are_rejected() {
        assert!("done".parse::<PyqFilter>().is_err());
        assert!("NOT-DONE".parse::<PyqFilter>().is_err());
        assert!("not-started".parse::<PyqFilter>().is_err());
    }
}
