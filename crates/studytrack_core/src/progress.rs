//! Roll-up arithmetic from leaf statuses to percentages.
//!
//! # Responsibility
//! - Derive unit, subject and dashboard progress from the current tree.
//! - Derive PYQ practice counts and attendance percentages.
//!
//! # Invariants
//! - Every function is pure and recomputes from its input; nothing is cached.
//! - Percentages are integers in `0..=100`, rounded half up.
//! - Empty inputs never divide by zero: unit/syllabus progress of nothing is
//!   0%, attendance with no recorded classes is 100%.

use crate::model::{Attendance, PyqItem, SubjectCode, Syllabus, Unit};
use crate::state::StateTree;
use crate::status::{PyqStatus, TopicStatus};

/// Topic counts for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitProgress {
    pub completed: u32,
    pub in_progress: u32,
    pub total: u32,
    pub percent: u8,
}

/// Topic counts summed across a subject's units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyllabusProgress {
    pub completed_topics: u32,
    pub in_progress_topics: u32,
    pub total_topics: u32,
    pub percent: u8,
}

impl SyllabusProgress {
    /// Topics not yet started.
    pub fn remaining(&self) -> u32 {
        self.total_topics
            .saturating_sub(self.completed_topics)
            .saturating_sub(self.in_progress_topics)
    }

    fn add(&mut self, completed: u32, in_progress: u32, total: u32) {
        self.completed_topics += completed;
        self.in_progress_topics += in_progress;
        self.total_topics += total;
        self.percent = round_percent(self.completed_topics, self.total_topics, 0);
    }
}

/// PYQ practice counts; `mastered + practiced + not_done == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PyqStats {
    pub total: u32,
    pub mastered: u32,
    pub practiced: u32,
    pub not_done: u32,
}

impl PyqStats {
    fn merge(&mut self, other: PyqStats) {
        self.total += other.total;
        self.mastered += other.mastered;
        self.practiced += other.practiced;
        self.not_done += other.not_done;
    }
}

/// Derived view of one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSummary {
    pub code: SubjectCode,
    pub syllabus: SyllabusProgress,
    pub pyq: PyqStats,
    /// `None` when no attendance record exists for the subject.
    pub attendance_percent: Option<u8>,
    pub note_count: usize,
}

/// Derived view across all subjects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dashboard {
    /// One entry per subject in subjects-section order.
    pub subjects: Vec<SubjectSummary>,
    /// Topic-weighted progress over every syllabus.
    pub syllabus: SyllabusProgress,
    pub pyq: PyqStats,
    /// Attendance over the summed class counts.
    pub attendance_percent: u8,
}

/// `round(100 * part / whole)` with ties rounded up; `empty` when `whole == 0`.
pub fn round_percent(part: u32, whole: u32, empty: u8) -> u8 {
    if whole == 0 {
        return empty;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    let percent = (200 * part + whole) / (2 * whole);
    u8::try_from(percent).unwrap_or(100)
}

pub fn unit_progress(unit: &Unit) -> UnitProgress {
    let mut progress = UnitProgress::default();
    for topic in &unit.topics {
        progress.total += 1;
        match topic.status {
            TopicStatus::Completed => progress.completed += 1,
            TopicStatus::InProgress => progress.in_progress += 1,
            TopicStatus::NotStarted => {}
        }
    }
    progress.percent = round_percent(progress.completed, progress.total, 0);
    progress
}

pub fn syllabus_progress(syllabus: &Syllabus) -> SyllabusProgress {
    let mut progress = SyllabusProgress::default();
    for (_, unit) in syllabus.units() {
        let unit = unit_progress(unit);
        progress.add(unit.completed, unit.in_progress, unit.total);
    }
    progress
}

pub fn pyq_stats(items: &[PyqItem]) -> PyqStats {
    let mut stats = PyqStats::default();
    for item in items {
        stats.total += 1;
        match item.status {
            PyqStatus::Mastered => stats.mastered += 1,
            PyqStatus::Practiced => stats.practiced += 1,
            PyqStatus::NotStarted => stats.not_done += 1,
        }
    }
    stats
}

pub fn attendance_percent(record: &Attendance) -> u8 {
    round_percent(record.attended, record.total, 100)
}

/// Summary for one subject code; absent sections count as empty.
pub fn subject_summary(tree: &StateTree, code: &str) -> SubjectSummary {
    SubjectSummary {
        code: code.to_string(),
        syllabus: tree
            .syllabus_for(code)
            .map(|syllabus| syllabus_progress(syllabus))
            .unwrap_or_default(),
        pyq: pyq_stats(tree.pyqs_for(code)),
        attendance_percent: tree.attendance_for(code).map(attendance_percent),
        note_count: tree.notes_for(code).len(),
    }
}

/// Summaries for every subject plus global roll-ups.
pub fn dashboard(tree: &StateTree) -> Dashboard {
    let mut dashboard = Dashboard::default();
    let mut classes = Attendance::default();

    for code in tree.subjects().keys() {
        let summary = subject_summary(tree, code);
        dashboard.syllabus.add(
            summary.syllabus.completed_topics,
            summary.syllabus.in_progress_topics,
            summary.syllabus.total_topics,
        );
        dashboard.pyq.merge(summary.pyq);
        if let Some(record) = tree.attendance_for(code) {
            classes.total = classes.total.saturating_add(record.total);
            classes.attended = classes.attended.saturating_add(record.attended);
        }
        dashboard.subjects.push(summary);
    }

    dashboard.attendance_percent = attendance_percent(&classes);
    dashboard
}

#[cfg(test)]
mod tests {
    use super::round_percent;

    #[test]
    fn round_percent_rounds_half_up() {
        assert_eq!(round_percent(1, 8, 0), 13);
        assert_eq!(round_percent(1, 3, 0), 33);
        assert_eq!(round_percent(2, 3, 0), 67);
        assert_eq!(round_percent(1, 200, 0), 1);
    }

    #[test]
    fn round_percent_uses_empty_policy_and_caps_at_100() {
        assert_eq!(round_percent(0, 0, 0), 0);
        assert_eq!(round_percent(0, 0, 100), 100);
        assert_eq!(round_percent(5, 4, 0), 100);
        assert_eq!(round_percent(u32::MAX, u32::MAX, 0), 100);
    }
}
