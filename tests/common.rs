#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, TimeZone, Utc};
use keeperlog::models::{Capture, CaptureType, Session, SessionStatus};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Private scratch directory for one test (config home, db, exports).
pub fn test_home(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("keeperlog_test_{}", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).ok();
    path
}

/// The binary, isolated from the real user config.
pub fn kl(home: &PathBuf) -> Command {
    let mut cmd = cargo_bin_cmd!("keeperlog");
    cmd.env("KEEPERLOG_HOME", home);
    cmd
}

pub fn db_path(home: &PathBuf) -> String {
    home.join("journal.sqlite").to_string_lossy().to_string()
}

pub fn out_path(home: &PathBuf, file: &str) -> String {
    home.join(file).to_string_lossy().to_string()
}

/// Init a fresh journal and return its db path.
pub fn init_journal(home: &PathBuf) -> String {
    let db = db_path(home);
    kl(home)
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success();
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A completed session on `day`, tagged with `competencies`.
pub fn completed_session(id: i64, day: NaiveDate, competencies: &[&str]) -> Session {
    let start = Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).unwrap());
    let mut s = Session::start(day, start, "Taronga Zoo");
    s.id = Some(id);
    s.status = SessionStatus::Completed;
    s.end_time = Some(start + chrono::Duration::minutes(120));
    s.duration_minutes = 120;
    s.competencies = competencies.iter().map(|c| c.to_string()).collect();
    s
}

pub fn capture(session_id: i64, kind: CaptureType, tags: &[&str]) -> Capture {
    let mut c = Capture::new(session_id, kind, Some("note".to_string()));
    c.tags = tags.iter().map(|t| t.to_string()).collect();
    c
}
