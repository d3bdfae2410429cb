//! Lenient decoding of persisted section payloads.
//!
//! # Responsibility
//! - Turn stored JSON into typed section values.
//! - Recover malformed leaves locally and report them as warnings.
//!
//! # Invariants
//! - Decoding never fails: a bad leaf is defaulted or skipped, a bad section
//!   decodes as empty.
//! - Missing or unknown statuses decode as `not-started`.
//! - Unparsable marks and attendance counters decode as 0 with a warning.
//! - Numeric tags are kept as text; other non-text tags are dropped with a
//!   warning.
//! - Warnings carry ids and paths only, never note or question text.

use super::{SectionName, SectionValue, StateTree};
use crate::model::{try_parse_marks, Attendance, Note, PyqItem, Subject, Syllabus, Topic, Unit};
use crate::status::{CyclicStatus, PyqStatus, TopicStatus};
use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use log::warn;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const NOTE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d.%m.%Y"];

/// Recoverable problem found in one persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntityWarning {
    pub section: SectionName,
    /// Record kind, e.g. `topic` or `pyq`.
    pub entity: &'static str,
    /// Slash-separated location inside the section, e.g. `CS101/unit1/3`.
    pub path: String,
    pub detail: String,
}

impl Display for MalformedEntityWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "malformed {} at {}/{}: {}",
            self.entity, self.section, self.path, self.detail
        )
    }
}

/// Decoded value plus the warnings raised while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub warnings: Vec<MalformedEntityWarning>,
}

/// Decodes one section payload.
pub fn decode_section(name: SectionName, payload: &Value) -> Decoded<SectionValue> {
    let mut decoder = Decoder {
        section: name,
        warnings: Vec::new(),
    };
    let value = decoder.section(payload);
    Decoded {
        value,
        warnings: decoder.warnings,
    }
}

/// Decodes a set of section payloads into a tree; absent sections are empty.
pub fn decode_tree<'a>(
    payloads: impl IntoIterator<Item = (SectionName, &'a Value)>,
) -> Decoded<StateTree> {
    let mut tree = StateTree::new();
    let mut warnings = Vec::new();
    for (name, payload) in payloads {
        let decoded = decode_section(name, payload);
        tree = tree.with_section(decoded.value);
        warnings.extend(decoded.warnings);
    }
    Decoded {
        value: tree,
        warnings,
    }
}

/// Reads a note date in ISO or common locale formats.
pub fn parse_note_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(date_time.date_naive());
    }
    NOTE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

struct Decoder {
    section: SectionName,
    warnings: Vec<MalformedEntityWarning>,
}

impl Decoder {
    fn warn(&mut self, entity: &'static str, path: impl Into<String>, detail: impl Into<String>) {
        let warning = MalformedEntityWarning {
            section: self.section,
            entity,
            path: path.into(),
            detail: detail.into(),
        };
        warn!(
            "event=decode_recover module=state status=warn section={} entity={} path={} detail={}",
            warning.section, warning.entity, warning.path, warning.detail
        );
        self.warnings.push(warning);
    }

    fn section(&mut self, payload: &Value) -> SectionValue {
        let empty = Map::new();
        let entries = match payload {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => {
                self.warn("section", "", "payload is not an object");
                &empty
            }
        };

        match self.section {
            SectionName::Subjects => {
                SectionValue::Subjects(Arc::new(self.entries(entries, Self::subject)))
            }
            SectionName::Notes => SectionValue::Notes(Arc::new(self.entries(entries, Self::notes))),
            SectionName::Syllabus => {
                SectionValue::Syllabus(Arc::new(self.entries(entries, Self::syllabus)))
            }
            SectionName::Pyq => SectionValue::Pyq(Arc::new(self.entries(entries, Self::pyqs))),
            SectionName::Attendance => {
                SectionValue::Attendance(Arc::new(self.entries(entries, Self::attendance)))
            }
        }
    }

    fn entries<T>(
        &mut self,
        entries: &Map<String, Value>,
        decode: fn(&mut Self, &str, &Value) -> Option<T>,
    ) -> IndexMap<String, Arc<T>> {
        let mut section = IndexMap::with_capacity(entries.len());
        for (code, value) in entries {
            if let Some(record) = decode(self, code, value) {
                section.insert(code.clone(), Arc::new(record));
            }
        }
        section
    }

    fn subject(&mut self, code: &str, value: &Value) -> Option<Subject> {
        let Some(object) = value.as_object() else {
            self.warn("subject", code, "entry is not an object; skipped");
            return None;
        };
        let name = text_field(object, "name").unwrap_or_default();
        let short_name = text_field(object, "shortName").unwrap_or_else(|| name.clone());
        let credits = self.counter("subject", code, object, "credits");
        Some(Subject {
            name,
            short_name,
            color: text_field(object, "color").unwrap_or_default(),
            credits,
        })
    }

    fn notes(&mut self, code: &str, value: &Value) -> Option<Vec<Note>> {
        let Some(items) = value.as_array() else {
            self.warn("note", code, "entry is not a list; skipped");
            return None;
        };
        let mut notes = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let path = format!("{code}/{index}");
            let Some(object) = item.as_object() else {
                self.warn("note", path, "record is not an object; skipped");
                continue;
            };
            let Some(id) = text_field(object, "id") else {
                self.warn("note", path, "missing id; skipped");
                continue;
            };
            let date = match object.get("date") {
                Some(Value::Null) => None,
                Some(Value::String(raw)) => {
                    let parsed = parse_note_date(raw);
                    if parsed.is_none() {
                        self.warn("note", format!("{code}/{id}"), "unreadable date");
                    }
                    parsed
                }
                _ => {
                    self.warn("note", format!("{code}/{id}"), "missing date");
                    None
                }
            };
            notes.push(Note {
                title: text_field(object, "title").unwrap_or_default(),
                content: text_field(object, "content").unwrap_or_default(),
                tags: self.tags(&format!("{code}/{id}"), object.get("tags")),
                id,
                date,
            });
        }
        Some(notes)
    }

    fn syllabus(&mut self, code: &str, value: &Value) -> Option<Syllabus> {
        let Some(units) = value.as_object() else {
            self.warn("syllabus", code, "entry is not an object; skipped");
            return None;
        };
        let mut syllabus = Syllabus::new();
        for (unit_name, unit_value) in units {
            let path = format!("{code}/{unit_name}");
            let Some(unit) = unit_value.as_object() else {
                self.warn("unit", path, "unit is not an object; skipped");
                continue;
            };
            let raw_topics = unit.get("topics").and_then(Value::as_array);
            if raw_topics.is_none() {
                self.warn("unit", path.clone(), "missing topic list");
            }
            let mut topics = Vec::new();
            for (index, raw) in raw_topics.into_iter().flatten().enumerate() {
                if let Some(topic) = self.topic(&path, index, raw) {
                    topics.push(topic);
                }
            }
            let title = text_field(unit, "title").unwrap_or_else(|| unit_name.clone());
            syllabus.insert_unit(unit_name.clone(), Arc::new(Unit::new(title, topics)));
        }
        Some(syllabus)
    }

    fn topic(&mut self, unit_path: &str, index: usize, value: &Value) -> Option<Topic> {
        let Some(object) = value.as_object() else {
            self.warn(
                "topic",
                format!("{unit_path}/{index}"),
                "record is not an object; skipped",
            );
            return None;
        };
        let Some(id) = text_field(object, "id") else {
            self.warn("topic", format!("{unit_path}/{index}"), "missing id; skipped");
            return None;
        };
        let path = format!("{unit_path}/{id}");
        let status = self.status::<TopicStatus>("topic", &path, object.get("status"));
        Some(Topic {
            name: text_field(object, "name").unwrap_or_default(),
            id,
            status,
        })
    }

    fn pyqs(&mut self, code: &str, value: &Value) -> Option<Vec<PyqItem>> {
        let Some(items) = value.as_array() else {
            self.warn("pyq", code, "entry is not a list; skipped");
            return None;
        };
        let mut pyqs = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let Some(object) = item.as_object() else {
                self.warn("pyq", format!("{code}/{index}"), "record is not an object; skipped");
                continue;
            };
            let Some(id) = text_field(object, "id") else {
                self.warn("pyq", format!("{code}/{index}"), "missing id; skipped");
                continue;
            };
            let path = format!("{code}/{id}");
            let marks = match object.get("marks") {
                None | Some(Value::Null) => 0,
                Some(Value::String(raw)) if raw.trim().is_empty() => 0,
                Some(Value::String(raw)) => try_parse_marks(raw).unwrap_or_else(|| {
                    self.warn("pyq", path.clone(), "marks has no leading count; using 0");
                    0
                }),
                Some(raw) => count(raw).unwrap_or_else(|| {
                    self.warn("pyq", path.clone(), "marks is not a count; using 0");
                    0
                }),
            };
            let status = self.status::<PyqStatus>("pyq", &path, object.get("status"));
            pyqs.push(PyqItem {
                question: text_field(object, "question").unwrap_or_default(),
                year: text_field(object, "year").unwrap_or_default(),
                module: text_field(object, "module").unwrap_or_default(),
                id,
                marks,
                status,
            });
        }
        Some(pyqs)
    }

    fn attendance(&mut self, code: &str, value: &Value) -> Option<Attendance> {
        let Some(object) = value.as_object() else {
            self.warn("attendance", code, "entry is not an object; skipped");
            return None;
        };
        let total = self.counter("attendance", code, object, "total");
        let attended = self.counter("attendance", code, object, "attended");
        if attended > total {
            self.warn("attendance", code, "attended exceeds total; clamped");
        }
        Some(Attendance::new(total, attended))
    }

    /// Optional count field; present but unreadable values become 0.
    fn counter(
        &mut self,
        entity: &'static str,
        path: &str,
        object: &Map<String, Value>,
        key: &str,
    ) -> u32 {
        match object.get(key) {
            None | Some(Value::Null) => 0,
            Some(raw) => count(raw).unwrap_or_else(|| {
                self.warn(entity, path, format!("{key} is not a count; using 0"));
                0
            }),
        }
    }

    /// Text tags; numbers are stringified, other values dropped.
    fn tags(&mut self, path: &str, value: Option<&Value>) -> Vec<String> {
        let items = match value {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.warn("note", path, "tags is not a list; using none");
                return Vec::new();
            }
        };
        let mut tags = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(tag) => tags.push(tag.clone()),
                Value::Number(tag) => tags.push(tag.to_string()),
                _ => self.warn("note", path, "tag is not text; dropped"),
            }
        }
        tags
    }

    fn status<S: CyclicStatus>(&mut self, entity: &'static str, path: &str, raw: Option<&Value>) -> S {
        match raw {
            Some(Value::String(label)) => S::from_label(label).unwrap_or_else(|| {
                self.warn(entity, path, format!("unknown status `{label}`; using not-started"));
                S::initial()
            }),
            _ => {
                self.warn(entity, path, "missing status; using not-started");
                S::initial()
            }
        }
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_u64() {
                return u32::try_from(integer).ok();
            }
            number
                .as_f64()
                .filter(|float| float.is_finite() && *float >= 0.0 && *float <= f64::from(u32::MAX))
                .map(|float| float.trunc() as u32)
        }
        Value::String(raw) => raw.trim().parse::<u32>().ok(),
        _ => None,
    }
}
