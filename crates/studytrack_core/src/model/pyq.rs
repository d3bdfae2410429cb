//! Previous-year question records.

use crate::status::PyqStatus;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LEADING_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\+?(\d+)").expect("valid leading digits regex"));

/// One tracked previous-year exam question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyqItem {
    pub id: String,
    pub question: String,
    /// Free-text label such as `2023` or `Dec 2022`.
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub marks: u32,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub status: PyqStatus,
}

impl PyqItem {
    /// Creates a question in the initial `not-started` state.
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        year: impl Into<String>,
        marks: u32,
        module: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            year: year.into(),
            marks,
            module: module.into(),
            status: PyqStatus::NotStarted,
        }
    }

    pub fn with_status(mut self, status: PyqStatus) -> Self {
        self.status = status;
        self
    }
}

/// Parses user-entered marks.
///
/// Leading digits are honored (`"10 marks"` -> 10); anything else,
/// including negative or overflowing input, yields 0.
pub fn parse_marks(raw: &str) -> u32 {
    try_parse_marks(raw).unwrap_or(0)
}

/// Leading-digit marks, or `None` when `raw` carries no readable count.
pub fn try_parse_marks(raw: &str) -> Option<u32> {
    LEADING_DIGITS_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use super::{parse_marks, try_parse_marks};

    #[test]
    fn parse_marks_reads_leading_digits() {
        assert_eq!(parse_marks("10"), 10);
        assert_eq!(parse_marks("  7 marks"), 7);
        assert_eq!(parse_marks("+5"), 5);
    }

    #[test]
    fn parse_marks_defaults_to_zero() {
        assert_eq!(parse_marks(""), 0);
        assert_eq!(parse_marks("ten"), 0);
        assert_eq!(parse_marks("-3"), 0);
        assert_eq!(parse_marks("99999999999999999999"), 0);
    }

    #[test]
    fn try_parse_marks_separates_zero_from_unreadable() {
        assert_eq!(try_parse_marks("0"), Some(0));
        assert_eq!(try_parse_marks("abc"), None);
        assert_eq!(try_parse_marks(" 12/20"), Some(12));
    }
}
