use chrono::NaiveDate;
use indexmap::IndexMap;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use studytrack_core::{
    IdError, IdGenerator, MemoryStore, NoteDraft, PyqDraft, PyqFilter, PyqStatus, SectionValue,
    StateTree, Store, StoreError, StoreResult, Subject, Topic, TopicStatus, TrackerError,
    TrackerService, Unit, UpdateError,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn seeded_service() -> TrackerService<MemoryStore> {
    let tree = StateTree::new().insert_unit(
        "CS101",
        "unit1",
        Unit::new(
            "Basics",
            vec![Topic::new("1", "Variables"), Topic::new("2", "Loops")],
        ),
    );
    TrackerService::open(MemoryStore::with_tree(tree)).unwrap()
}

struct BrokenIds;

impl IdGenerator for BrokenIds {
    fn generate(&self) -> Result<String, IdError> {
        Err(IdError("entropy unavailable".to_string()))
    }
}

/// Store whose saves fail while the shared switch is on.
struct FlakyStore {
    failing: Rc<Cell<bool>>,
    saved: Option<StateTree>,
}

impl Store for FlakyStore {
    fn load(&mut self) -> StoreResult<StateTree> {
        Ok(StateTree::new())
    }

    fn save(&mut self, tree: &StateTree) -> StoreResult<()> {
        if self.failing.get() {
            let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
            return Err(StoreError::Json(err));
        }
        self.saved = Some(tree.clone());
        Ok(())
    }
}

#[test]
fn failed_save_keeps_the_published_tree_and_the_next_save_writes_it() {
    let failing = Rc::new(Cell::new(true));
    let store = FlakyStore {
        failing: Rc::clone(&failing),
        saved: None,
    };
    let mut tracker = TrackerService::open(store).unwrap();

    let err = tracker
        .create_note_on("CS101", NoteDraft::new("Lecture 1", ""), day())
        .unwrap_err();
    assert!(matches!(err, TrackerError::Store(StoreError::Json(_))));
    assert_eq!(tracker.tree().notes_for("CS101").len(), 1);
    assert!(tracker.store().saved.is_none());

    failing.set(false);
    tracker
        .create_note_on("CS101", NoteDraft::new("Lecture 2", ""), day())
        .unwrap();

    let saved = tracker.store().saved.as_ref().unwrap();
    let titles: Vec<&str> = saved
        .notes_for("CS101")
        .iter()
        .map(|note| note.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Lecture 1", "Lecture 2"]);
    assert_eq!(saved, tracker.tree().as_ref());
}

#[test]
fn note_lifecycle_saves_each_change() {
    let mut tracker = TrackerService::open(MemoryStore::new()).unwrap();

    let draft = NoteDraft::new("  Lecture 1 ", "processes").with_tag_input("exam, Exam, ,os");
    let note = tracker.create_note_on("CS101", draft, day()).unwrap();
    assert_eq!(note.title, "Lecture 1");
    assert_eq!(note.tags, vec!["exam".to_string(), "os".to_string()]);
    assert_eq!(note.date, Some(day()));
    assert!(!note.id.is_empty());
    assert_eq!(tracker.store().save_count(), 1);

    let edited = tracker
        .edit_note("CS101", &note.id, NoteDraft::new("Lecture 1 (final)", "threads"))
        .unwrap();
    assert_eq!(edited.id, note.id);
    assert_eq!(edited.date, Some(day()));
    assert_eq!(tracker.search_notes("CS101", "THREADS").len(), 1);
    assert_eq!(tracker.store().save_count(), 2);

    tracker.delete_note("CS101", &note.id).unwrap();
    assert!(tracker.tree().notes_for("CS101").is_empty());
    assert_eq!(tracker.store().save_count(), 3);
    assert_eq!(tracker.store().saved(), Some(tracker.tree().as_ref()));
}

#[test]
fn no_op_actions_do_not_save() {
    let mut tracker = seeded_service();
    let before = tracker.tree();

    tracker.delete_note("CS101", "missing").unwrap();
    tracker.delete_pyq("CS101", "missing").unwrap();

    assert_eq!(tracker.store().save_count(), 0);
    assert!(Arc::ptr_eq(&before, &tracker.tree()));
}

#[test]
fn blank_titles_and_questions_are_rejected() {
    let mut tracker = seeded_service();

    let err = tracker
        .create_note_on("CS101", NoteDraft::new("   ", "body"), day())
        .unwrap_err();
    assert!(matches!(err, TrackerError::EmptyField("note title")));

    let err = tracker.add_pyq("CS101", PyqDraft::default()).unwrap_err();
    assert!(matches!(err, TrackerError::EmptyField("question")));
    assert_eq!(tracker.store().save_count(), 0);
}

#[test]
fn cycling_topics_updates_progress() {
    let mut tracker = seeded_service();
    let snapshot = tracker.tree();

    assert_eq!(
        tracker.cycle_topic("CS101", "unit1", "1").unwrap(),
        TopicStatus::InProgress
    );
    assert_eq!(
        tracker.cycle_topic("CS101", "unit1", "1").unwrap(),
        TopicStatus::Completed
    );
    assert_eq!(tracker.subject_summary("CS101").syllabus.percent, 50);
    assert_eq!(tracker.store().save_count(), 2);

    let snapshot_status = snapshot
        .syllabus_for("CS101")
        .unwrap()
        .unit("unit1")
        .unwrap()
        .topic("1")
        .unwrap()
        .status;
    assert_eq!(snapshot_status, TopicStatus::NotStarted);
}

#[test]
fn cycling_a_missing_topic_reports_and_keeps_the_tree() {
    let mut tracker = seeded_service();
    let before = tracker.tree();

    let err = tracker.cycle_topic("CS101", "unit1", "99").unwrap_err();
    assert!(matches!(
        err,
        TrackerError::Update(UpdateError::TopicNotFound { .. })
    ));
    assert!(Arc::ptr_eq(&before, &tracker.tree()));
    assert_eq!(tracker.store().save_count(), 0);
}

#[test]
fn pyq_flow_parses_marks_and_filters() {
    let mut tracker = seeded_service();
    let draft = PyqDraft {
        question: "Explain deadlock".to_string(),
        year: " 2023 ".to_string(),
        marks: "10 marks".to_string(),
        module: "Concurrency".to_string(),
    };
    let item = tracker.add_pyq("CS101", draft).unwrap();
    assert_eq!(item.marks, 10);
    assert_eq!(item.year, "2023");
    assert_eq!(item.status, PyqStatus::NotStarted);

    assert_eq!(
        tracker.cycle_pyq("CS101", &item.id).unwrap(),
        PyqStatus::Practiced
    );
    assert_eq!(tracker.pyqs("CS101", PyqFilter::NotDone, "").len(), 0);
    assert_eq!(tracker.pyqs("CS101", PyqFilter::Practiced, "deadlock").len(), 1);

    tracker.delete_pyq("CS101", &item.id).unwrap();
    assert!(tracker.tree().pyqs_for("CS101").is_empty());
    assert_eq!(tracker.store().save_count(), 3);
}

#[test]
fn failing_id_generator_falls_back_to_a_local_id() {
    let mut tracker = seeded_service().with_id_generator(BrokenIds);
    let first = tracker
        .create_note_on("CS101", NoteDraft::new("A", ""), day())
        .unwrap();
    let second = tracker
        .create_note_on("CS101", NoteDraft::new("B", ""), day())
        .unwrap();

    assert!(!first.id.is_empty());
    assert_ne!(first.id, second.id);
    assert_eq!(tracker.tree().notes_for("CS101").len(), 2);
}

#[test]
fn update_section_goes_through_the_service() {
    let mut tracker = seeded_service();
    let mut subjects = IndexMap::new();
    subjects.insert("CS101".to_string(), Arc::new(Subject::new("Programming", "PROG", 4)));

    let tree = tracker
        .update_section("subjects", SectionValue::Subjects(Arc::new(subjects)))
        .unwrap();
    assert_eq!(tree.subjects().len(), 1);
    assert_eq!(tracker.dashboard().subjects.len(), 1);

    let err = tracker
        .update_section("grades", SectionValue::Subjects(Arc::default()))
        .unwrap_err();
    assert!(matches!(err, TrackerError::Section(_)));
    assert_eq!(tracker.store().save_count(), 1);
}
