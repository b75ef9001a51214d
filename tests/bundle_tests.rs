use keeperlog::db::{Store, StoreOptions};
use keeperlog::errors::{AppError, AppResult};
use keeperlog::export::ProfileWrite;
use keeperlog::export::bundle::{BUNDLE_VERSION, read_bundle_file, write_bundle};
use keeperlog::models::{Capture, CaptureType, Competency, Session, SessionStatus};
use keeperlog::profile::{MemoryProfileStore, ProfileStore};
use serde_json::{Value, json};

mod common;
use common::{completed_session, date, test_home};

/// A profile store whose writes always fail.
struct BrokenProfiles;

impl ProfileStore for BrokenProfiles {
    fn load(&self) -> AppResult<Value> {
        Ok(json!({}))
    }

    fn save(&self, _profile: &Value) -> AppResult<()> {
        Err(AppError::Other("disk full".into()))
    }
}

fn empty_store() -> Store {
    Store::open_in_memory_with(StoreOptions {
        seed_defaults: false,
        seed_threshold: 0,
    })
    .unwrap()
}

/// Seeded journal with two sessions and one capture.
fn sample_store() -> Store {
    let mut store = Store::open_in_memory().unwrap();
    for day in [1, 2] {
        let mut s = completed_session(0, date(2024, 3, day), &["Safe handling and restraint"]);
        s.id = None;
        store.add(&s).unwrap();
    }
    let mut photo = Capture::new(1, CaptureType::Photo, None);
    photo.media_url = Some("data:image/png;base64,AAAA".into());
    store.add(&photo).unwrap();
    store
}

/// Bundle of `sample_store` plus a profile.
fn sample_bundle() -> Value {
    let store = sample_store();
    let profiles = MemoryProfileStore::with(json!({ "name": "Alex", "targetHours": 120 }));
    let bundle = store.create_bundle(&profiles).unwrap();
    assert_eq!(bundle.version, BUNDLE_VERSION);
    serde_json::to_value(&bundle).unwrap()
}

#[test]
fn test_restore_round_trip() {
    let candidate = sample_bundle();
    let mut target = empty_store();
    let profiles = MemoryProfileStore::default();

    let report = target.restore_bundle(&candidate, &profiles).unwrap();

    assert_eq!(report.sessions, 2);
    assert_eq!(report.captures, 1);
    assert_eq!(report.competencies, 10);
    assert_eq!(report.profile, ProfileWrite::Saved);
    assert_eq!(target.count::<Session>().unwrap(), 2);
    assert_eq!(target.captures_for_session(1).unwrap().len(), 1);
    assert_eq!(profiles.load().unwrap()["name"], "Alex");
    assert!(target.last_audit("restore").unwrap().is_some());
}

#[test]
fn test_restored_rows_equal_the_originals() {
    let source = sample_store();
    let bundle = source.create_bundle(&MemoryProfileStore::default()).unwrap();
    let candidate = serde_json::to_value(&bundle).unwrap();

    let mut target = empty_store();
    target
        .restore_bundle(&candidate, &MemoryProfileStore::default())
        .unwrap();

    assert_eq!(target.all::<Session>().unwrap(), source.all::<Session>().unwrap());
    assert_eq!(target.all::<Capture>().unwrap(), source.all::<Capture>().unwrap());
    assert_eq!(target.all::<Competency>().unwrap(), source.all::<Competency>().unwrap());
}

#[test]
fn test_failed_restore_leaves_store_untouched() {
    let mut candidate = sample_bundle();
    let dup = candidate["competencies"][0].clone();
    let mut dup = dup.as_object().unwrap().clone();
    dup.insert("id".into(), json!(999));
    candidate["competencies"]
        .as_array_mut()
        .unwrap()
        .push(Value::Object(dup));

    let mut target = empty_store();
    let mut keep = completed_session(0, date(2023, 12, 1), &[]);
    keep.id = None;
    target.add(&keep).unwrap();
    let profiles = MemoryProfileStore::with(json!({ "name": "Before" }));

    let res = target.restore_bundle(&candidate, &profiles);

    assert!(matches!(res, Err(AppError::TransactionFailure(_))));
    let sessions = target.all::<Session>().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].date, date(2023, 12, 1));
    assert_eq!(target.count::<Competency>().unwrap(), 0);
    assert_eq!(profiles.load().unwrap()["name"], "Before");
}

#[test]
fn test_orphan_capture_aborts_restore() {
    let mut candidate = sample_bundle();
    candidate["captures"][0]["sessionId"] = json!(77);

    let mut target = empty_store();
    let res = target.restore_bundle(&candidate, &MemoryProfileStore::default());
    assert!(matches!(res, Err(AppError::TransactionFailure(_))));
    assert_eq!(target.count::<Session>().unwrap(), 0);
}

#[test]
fn test_malformed_bundles_are_rejected() {
    let mut target = empty_store();
    let profiles = MemoryProfileStore::default();

    assert!(matches!(
        target.restore_bundle(&json!([1, 2, 3]), &profiles),
        Err(AppError::InvalidFormat(_))
    ));
    assert!(matches!(
        target.restore_bundle(&json!({ "sessions": "nope" }), &profiles),
        Err(AppError::InvalidFormat(_))
    ));
}

#[test]
fn test_missing_and_null_tables_restore_empty() {
    let mut target = empty_store();
    let report = target
        .restore_bundle(
            &json!({ "version": 2, "sessions": null }),
            &MemoryProfileStore::default(),
        )
        .unwrap();

    assert_eq!(report.sessions, 0);
    assert_eq!(report.profile, ProfileWrite::Skipped);
}

#[test]
fn test_profile_failure_is_reported_not_raised() {
    let mut target = empty_store();
    let report = target.restore_bundle(&sample_bundle(), &BrokenProfiles).unwrap();

    assert!(matches!(report.profile, ProfileWrite::Failed(_)));
    assert_eq!(target.count::<Session>().unwrap(), 2);
}

#[test]
fn test_extra_active_sessions_are_completed() {
    let mut candidate = sample_bundle();
    for row in candidate["sessions"].as_array_mut().unwrap() {
        row["status"] = json!("active");
    }

    let mut target = empty_store();
    let report = target
        .restore_bundle(&candidate, &MemoryProfileStore::default())
        .unwrap();

    assert_eq!(report.auto_completed, 1);
    let active = target.sessions_by_status(SessionStatus::Active).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].date, date(2024, 3, 2));
}

#[test]
fn test_oversized_duration_leaves_settled_session_open_ended() {
    let mut candidate = sample_bundle();
    for row in candidate["sessions"].as_array_mut().unwrap() {
        row["status"] = json!("active");
        row["endTime"] = Value::Null;
    }
    candidate["sessions"][0]["durationMinutes"] = json!(i64::MAX);

    let mut target = empty_store();
    let report = target
        .restore_bundle(&candidate, &MemoryProfileStore::default())
        .unwrap();

    assert_eq!(report.auto_completed, 1);
    let done = target.sessions_by_status(SessionStatus::Completed).unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].date, date(2024, 3, 1));
    assert_eq!(done[0].end_time, None);
}

#[test]
fn test_epoch_millis_timestamps_are_accepted() {
    let mut candidate = sample_bundle();
    candidate["captures"][0]["timestamp"] = json!(1_709_280_000_000_i64);

    let mut target = empty_store();
    target
        .restore_bundle(&candidate, &MemoryProfileStore::default())
        .unwrap();

    let capture = &target.all::<Capture>().unwrap()[0];
    assert_eq!(capture.timestamp.timestamp_millis(), 1_709_280_000_000);
}

#[test]
fn test_zip_bundle_round_trip() {
    let home = test_home("zip_bundle");
    let store = Store::open_in_memory().unwrap();
    let bundle = store.create_bundle(&MemoryProfileStore::default()).unwrap();

    let written = write_bundle(&bundle, &home.join("backup.json"), true).unwrap();
    assert_eq!(written.extension().unwrap(), "zip");

    let value = read_bundle_file(&written).unwrap();
    assert_eq!(value["competencies"].as_array().unwrap().len(), 10);
}
