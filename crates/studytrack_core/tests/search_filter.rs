use chrono::NaiveDate;
use studytrack_core::{
    filter_pyqs, query_pyqs, search_notes, search_pyqs, Note, PyqFilter, PyqItem, PyqStatus,
};

fn note(id: &str, title: &str, content: &str, tags: &[&str]) -> Note {
    Note::new(
        id,
        title,
        content,
        tags.iter().map(|tag| tag.to_string()).collect(),
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
    )
}

fn exam_notes() -> Vec<Note> {
    vec![
        note("1", "Exam tips", "", &[]),
        note("2", "Homework", "for exam prep", &[]),
        note("3", "Other", "", &["exam"]),
        note("4", "Lab report", "circuits", &["physics"]),
    ]
}

fn note_ids(notes: &[&Note]) -> Vec<String> {
    notes.iter().map(|note| note.id.clone()).collect()
}

fn pyq_ids(items: &[&PyqItem]) -> Vec<String> {
    items.iter().map(|item| item.id.clone()).collect()
}

#[test]
fn note_search_matches_title_content_and_tags() {
    let notes = exam_notes();
    let hits = search_notes(&notes, "exam");
    assert_eq!(note_ids(&hits), vec!["1", "2", "3"]);
}

#[test]
fn note_search_is_case_insensitive() {
    let notes = exam_notes();
    let hits = search_notes(&notes, "EXAM");
    assert_eq!(note_ids(&hits), vec!["1", "2", "3"]);
}

#[test]
fn empty_note_query_matches_everything() {
    let notes = exam_notes();
    assert_eq!(search_notes(&notes, "").len(), notes.len());
    assert!(search_notes(&notes, "quantum").is_empty());
}

#[test]
fn note_search_reflects_current_collection() {
    let mut notes = exam_notes();
    assert_eq!(search_notes(&notes, "circuits").len(), 1);
    notes.retain(|note| note.id != "4");
    assert!(search_notes(&notes, "circuits").is_empty());
}

fn pyqs(statuses: &[PyqStatus]) -> Vec<PyqItem> {
    statuses
        .iter()
        .enumerate()
        .map(|(index, status)| {
            PyqItem::new(
                format!("q{}", index + 1),
                format!("Explain topic {}", index + 1),
                "2022",
                10,
                "Module 2",
            )
            .with_status(*status)
        })
        .collect()
}

#[test]
fn not_done_filter_keeps_only_not_started_items() {
    let items = pyqs(&[
        PyqStatus::NotStarted,
        PyqStatus::Practiced,
        PyqStatus::Mastered,
        PyqStatus::NotStarted,
    ]);
    let hits = filter_pyqs(&items, PyqFilter::NotDone);
    assert_eq!(pyq_ids(&hits), vec!["q1", "q4"]);
}

#[test]
fn exact_status_filters_and_all() {
    let items = pyqs(&[
        PyqStatus::Mastered,
        PyqStatus::Practiced,
        PyqStatus::Mastered,
    ]);
    assert_eq!(filter_pyqs(&items, PyqFilter::Mastered).len(), 2);
    assert_eq!(filter_pyqs(&items, PyqFilter::Practiced).len(), 1);
    assert_eq!(filter_pyqs(&items, PyqFilter::All).len(), 3);
    assert_eq!(filter_pyqs(&items, PyqFilter::default()).len(), 3);
}

#[test]
fn filter_keys_parse_and_unknown_keys_are_rejected() {
    assert_eq!("not-done".parse::<PyqFilter>().unwrap(), PyqFilter::NotDone);
    assert_eq!("all".parse::<PyqFilter>().unwrap(), PyqFilter::All);
    let err = "starred".parse::<PyqFilter>().unwrap_err();
    assert!(err.to_string().contains("starred"));
}

#[test]
fn pyq_text_search_covers_question_module_and_year() {
    let items = vec![
        PyqItem::new("a", "Define deadlock", "2021", 5, "Concurrency"),
        PyqItem::new("b", "Paging vs segmentation", "Dec 2022", 10, "Memory"),
        PyqItem::new("c", "Explain RAID levels", "2023", 10, "Storage"),
    ];
    assert_eq!(search_pyqs(&items, "DEADLOCK").len(), 1);
    assert_eq!(search_pyqs(&items, "memory").len(), 1);
    assert_eq!(search_pyqs(&items, "dec 2022").len(), 1);
    assert_eq!(search_pyqs(&items, "").len(), 3);
}

#[test]
fn combined_query_applies_filter_and_text() {
    let items = vec![
        PyqItem::new("a", "Define deadlock", "2021", 5, "Concurrency")
            .with_status(PyqStatus::Mastered),
        PyqItem::new("b", "Deadlock avoidance", "2022", 10, "Concurrency"),
    ];
    let hits = query_pyqs(&items, PyqFilter::NotDone, "deadlock");
    assert_eq!(pyq_ids(&hits), vec!["b"]);
}
