use keeperlog::db::{Completion, Store, StoreOptions, Table};
use keeperlog::errors::AppError;
use keeperlog::models::{Capture, CaptureType, Competency, Session, SessionStatus};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

mod common;
use common::{completed_session, date};

fn empty_store() -> Store {
    Store::open_in_memory_with(StoreOptions {
        seed_defaults: false,
        seed_threshold: 0,
    })
    .unwrap()
}

/// A completed session without an id, ready to insert.
fn unsaved(day: chrono::NaiveDate) -> Session {
    let mut s = completed_session(0, day, &[]);
    s.id = None;
    s
}

fn active_session(day: u32) -> Session {
    let mut s = unsaved(date(2024, 3, day));
    s.status = SessionStatus::Active;
    s.end_time = None;
    s.duration_minutes = 0;
    s
}

#[test]
fn test_open_seeds_default_competencies() {
    let store = Store::open_in_memory().unwrap();
    let list = store.competencies(true).unwrap();
    assert_eq!(list.len(), 10);
    assert!(list.iter().all(|c| !c.is_user_defined()));
    assert!(store.last_audit("seed").unwrap().is_some());
}

#[test]
fn test_seed_skips_populated_tables() {
    let mut store = empty_store();
    for code in ["A", "B", "C", "D", "E"] {
        store.add_competency(code, "", "Custom").unwrap();
    }
    let outcome = store.seed_competencies(5);
    assert!(!outcome.changed());
    assert_eq!(store.count::<Competency>().unwrap(), 5);

    assert_eq!(store.reset_competencies().unwrap(), 10);
    assert!(store.competency_by_code("A").unwrap().is_none());
}

#[test]
fn test_only_one_active_session() {
    let mut store = empty_store();
    let first = store.start_session(&active_session(1)).unwrap();

    match store.start_session(&active_session(2)) {
        Err(AppError::ActiveSessionExists(id)) => assert_eq!(id, first),
        other => panic!("expected ActiveSessionExists, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_complete_session_derives_duration_and_reflection() {
    let mut store = empty_store();
    let s = active_session(1);
    let start = s.start_time;
    let id = store.start_session(&s).unwrap();

    let done = store
        .complete_session(
            id,
            Completion {
                end_time: Some(start + chrono::Duration::minutes(95)),
                reflection_prompts: vec![(
                    "What did you learn or understand better?".to_string(),
                    "Koala diet".to_string(),
                )],
                competencies: vec!["Routine animal care and husbandry".to_string()],
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(done.status, SessionStatus::Completed);
    assert_eq!(done.duration_minutes, 95);
    assert!(done.reflection.contains("Koala diet"));
    assert!(done.has_competency("routine animal care and husbandry"));

    assert!(matches!(
        store.complete_session(id, Completion::default()),
        Err(AppError::InvalidTransition(_))
    ));
    assert!(store.active_session().unwrap().is_none());
}

#[test]
fn test_end_before_start_is_rejected() {
    let mut store = empty_store();
    let s = active_session(1);
    let start = s.start_time;
    let id = store.start_session(&s).unwrap();

    let res = store.complete_session(
        id,
        Completion {
            end_time: Some(start - chrono::Duration::minutes(5)),
            ..Default::default()
        },
    );
    assert!(matches!(res, Err(AppError::InvalidFormat(_))));
}

#[test]
fn test_completed_session_cannot_be_reopened() {
    let mut store = empty_store();
    let id = store.add(&unsaved(date(2024, 3, 1))).unwrap();

    let res = store.update::<Session>(id, &json!({ "status": "active" }));
    assert!(matches!(res, Err(AppError::InvalidTransition(_))));
}

#[test]
fn test_capture_requires_existing_session() {
    let mut store = empty_store();
    let res = store.add(&Capture::new(42, CaptureType::Text, Some("x".into())));
    assert!(matches!(res, Err(AppError::NotFound { id: 42, .. })));
}

#[test]
fn test_deleting_a_session_removes_its_captures() {
    let mut store = empty_store();
    let keep = store.add(&unsaved(date(2024, 3, 1))).unwrap();
    let gone = store.add(&unsaved(date(2024, 3, 2))).unwrap();
    store
        .add(&Capture::new(keep, CaptureType::Text, Some("a".into())))
        .unwrap();
    store
        .add(&Capture::new(gone, CaptureType::Photo, None))
        .unwrap();

    store.delete::<Session>(gone).unwrap();

    assert_eq!(store.count::<Session>().unwrap(), 1);
    let left = store.all::<Capture>().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].session_id, keep);
    assert!(store.captures_by_type(CaptureType::Photo).unwrap().is_empty());
}

#[test]
fn test_duplicate_competency_codes_are_rejected() {
    let mut store = empty_store();
    store.add_competency("Reptile handling", "", "Custom").unwrap();
    let res = store.add_competency("  reptile HANDLING ", "", "Custom");
    assert!(matches!(res, Err(AppError::DuplicateCompetency(_))));
}

#[test]
fn test_confidence_and_visibility() {
    let mut store = empty_store();
    let id = store.add_competency("Reptile handling", "", "Custom").unwrap();

    assert_eq!(store.set_confidence(id, 4).unwrap().confidence_level(), 4);
    assert!(matches!(
        store.set_confidence(id, 6),
        Err(AppError::InvalidFormat(_))
    ));

    store.set_competency_active(id, false).unwrap();
    assert!(store.competencies(true).unwrap().is_empty());
    assert_eq!(store.competencies(false).unwrap().len(), 1);
}

#[test]
fn test_sessions_between_is_inclusive_and_newest_first() {
    let mut store = empty_store();
    for day in [1, 10, 20] {
        store.add(&unsaved(date(2024, 3, day))).unwrap();
    }
    let found = store
        .sessions_between(date(2024, 3, 1), date(2024, 3, 10))
        .unwrap();
    let days: Vec<_> = found.iter().map(|s| s.date).collect();
    assert_eq!(days, vec![date(2024, 3, 10), date(2024, 3, 1)]);
}

#[test]
fn test_subscribers_see_fresh_results() {
    let mut store = empty_store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let sub = store
        .subscribe(
            &[Table::Sessions],
            |s: &Store| s.count::<Session>(),
            move |res| sink.borrow_mut().push(res.unwrap_or(-1)),
        )
        .unwrap();

    store.add(&unsaved(date(2024, 3, 1))).unwrap();
    store.add_competency("Unrelated", "", "Custom").unwrap();

    assert_eq!(*seen.borrow(), vec![0, 1]);
    assert!(store.unsubscribe(sub));
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn test_closed_store_is_unavailable() {
    let mut store = empty_store();
    store.close().unwrap();
    assert!(!store.is_open());
    assert!(matches!(
        store.all::<Session>(),
        Err(AppError::StorageUnavailable(_))
    ));
}
