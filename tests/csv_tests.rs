use keeperlog::db::Store;
use keeperlog::errors::AppError;
use keeperlog::export::csv::{
    CSV_HEADER, REFLECTION_PROMPTS, parse_rows, sessions_from_csv, sessions_to_csv,
};
use keeperlog::models::{Session, SessionStatus};

mod common;
use common::{completed_session, date};

fn taronga() -> Session {
    let mut s = completed_session(1, date(2024, 3, 1), &[]);
    s.duration_minutes = 125;
    s.reflection_prompts
        .insert("Q1".to_string(), "Fed koalas".to_string());
    s
}

#[test]
fn test_export_row_layout() {
    let csv = sessions_to_csv(&[taronga()]);
    let mut lines = csv.lines();

    assert_eq!(lines.next(), Some(CSV_HEADER));
    let row = lines.next().unwrap();
    assert!(row.starts_with("2024-03-01,\"Taronga Zoo\","));
    assert!(row.contains(",125,\"Fed koalas\","));
    assert!(row.ends_with(",\"\",\"\",\"\""));
}

#[test]
fn test_taronga_round_trip() {
    let parsed = sessions_from_csv(&sessions_to_csv(&[taronga()]));
    assert!(parsed.skipped.is_empty());
    assert_eq!(parsed.sessions.len(), 1);

    let s = &parsed.sessions[0];
    assert_eq!(s.date, date(2024, 3, 1));
    assert_eq!(s.facility, "Taronga Zoo");
    assert_eq!(s.duration_minutes, 125);
    assert_eq!(s.status, SessionStatus::Completed);
    assert_eq!(
        s.reflection_prompts.get(REFLECTION_PROMPTS[0]).map(String::as_str),
        Some("Fed koalas")
    );
    assert!(s.reflection.contains("Fed koalas"));
    assert_eq!(s.supervisor, None);
}

#[test]
fn test_quotes_and_newlines_survive() {
    let mut s = taronga();
    s.facility = "The \"Big\" Zoo, Sydney".to_string();
    s.reflection_prompts.insert(
        REFLECTION_PROMPTS[2].to_string(),
        "line one\nline two".to_string(),
    );

    let back = sessions_from_csv(&sessions_to_csv(&[s]));
    let s = &back.sessions[0];
    assert_eq!(s.facility, "The \"Big\" Zoo, Sydney");
    assert_eq!(
        s.reflection_prompts.get(REFLECTION_PROMPTS[2]).map(String::as_str),
        Some("line one\nline two")
    );
}

#[test]
fn test_parse_rows_handles_crlf_and_blank_lines() {
    let rows = parse_rows("a,b\r\n\r\n\"c,d\",\"\"\r\n");
    assert_eq!(
        rows,
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c,d".to_string(), String::new()],
        ]
    );
}

#[test]
fn test_bad_rows_are_skipped() {
    let text = format!(
        "{}\n2024-03-01,\"Zoo\",\"\",\"\",60,\"\",\"\",\"\",\"\"\nnot-a-date,\"Zoo\",\"\",\"\",60,\"\",\"\",\"\",\"\"\n2024-03-02,\"short row\"",
        CSV_HEADER
    );
    let parsed = sessions_from_csv(&text);

    assert_eq!(parsed.sessions.len(), 1);
    assert_eq!(parsed.skipped.len(), 2);
    assert_eq!(parsed.skipped[0].row, 2);
    assert_eq!(parsed.skipped[1].row, 3);
}

#[test]
fn test_missing_duration_defaults_to_zero() {
    let text = format!("{}\n2024-03-01,\"Zoo\",\"Sam\",\"Keeper\",,\"\",\"\",\"\",\"\"", CSV_HEADER);
    let parsed = sessions_from_csv(&text);
    let s = &parsed.sessions[0];
    assert_eq!(s.duration_minutes, 0);
    assert_eq!(s.supervisor.as_deref(), Some("Sam"));
    assert_eq!(s.role.as_deref(), Some("Keeper"));
    assert!(s.reflection.is_empty());
}

#[test]
fn test_duration_reads_leading_digits() {
    let text = format!(
        "{h}\n2024-03-01,\"Zoo\",\"\",\"\",125.5,\"\",\"\",\"\",\"\"\n2024-03-02,\"Zoo\",\"\",\"\",90 mins,\"\",\"\",\"\",\"\"",
        h = CSV_HEADER
    );
    let parsed = sessions_from_csv(&text);
    let minutes: Vec<i64> = parsed.sessions.iter().map(|s| s.duration_minutes).collect();
    assert_eq!(minutes, vec![125, 90]);
}

#[test]
fn test_oversized_duration_skips_only_that_row() {
    let text = format!(
        "{h}\n2024-03-01,\"Zoo\",\"\",\"\",9223372036854775807,\"\",\"\",\"\",\"\"\n2024-03-02,\"Zoo\",\"\",\"\",99999999999999999999,\"\",\"\",\"\",\"\"\n2024-03-03,\"Zoo\",\"\",\"\",60,\"\",\"\",\"\",\"\"",
        h = CSV_HEADER
    );
    let parsed = sessions_from_csv(&text);

    assert_eq!(parsed.sessions.len(), 1);
    assert_eq!(parsed.sessions[0].date, date(2024, 3, 3));
    let rows: Vec<usize> = parsed.skipped.iter().map(|s| s.row).collect();
    assert_eq!(rows, vec![1, 2]);
}

#[test]
fn test_row_without_facility_is_skipped_not_fatal() {
    let mut store = Store::open_in_memory().unwrap();
    let text = format!(
        "{}\n2024-03-01,\"Zoo\",\"\",\"\",60,\"\",\"\",\"\",\"\"\n2024-03-02,\"\",\"\",\"\",60,\"\",\"\",\"\",\"\"",
        CSV_HEADER
    );

    let report = store.import_sessions_csv(&text).unwrap();

    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.count::<Session>().unwrap(), 1);
}

#[test]
fn test_import_into_store() {
    let mut store = Store::open_in_memory().unwrap();
    let report = store
        .import_sessions_csv(&sessions_to_csv(&[taronga(), taronga()]))
        .unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(store.count::<Session>().unwrap(), 2);
    assert!(store.last_audit("import").unwrap().is_some());
}

#[test]
fn test_import_without_data_rows_fails() {
    let mut store = Store::open_in_memory().unwrap();
    let res = store.import_sessions_csv(CSV_HEADER);
    assert!(matches!(res, Err(AppError::InvalidFormat(_))));
    assert_eq!(store.count::<Session>().unwrap(), 0);
}
