// src/export/bundle.rs

use crate::db::Store;
use crate::db::record::{Record, Table};
use crate::errors::{AppError, AppResult};
use crate::models::{Capture, Competency, LogEntry, Session, SessionStatus};
use crate::profile::ProfileStore;
use crate::ui::messages::{error, warning};
use crate::utils::date::fmt_datetime;
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub const BUNDLE_VERSION: i64 = 2;

/// Row fields that travel as text and are read back as dates.
pub const DATE_FIELDS: [&str; 6] = [
    "date",
    "startTime",
    "endTime",
    "createdAt",
    "updatedAt",
    "timestamp",
];

const TABLE_KEYS: [&str; 4] = ["sessions", "captures", "competencies", "logs"];

/// Full snapshot of the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBundle {
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub profile: Value,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub captures: Vec<Capture>,
    #[serde(default)]
    pub competencies: Vec<Competency>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl DataBundle {
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileWrite {
    Saved,
    /// The bundle carried no profile object.
    Skipped,
    /// Tables were restored but the profile could not be written.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub sessions: usize,
    pub captures: usize,
    pub competencies: usize,
    pub logs: usize,
    /// Extra active sessions closed to keep a single one open.
    pub auto_completed: usize,
    pub profile: ProfileWrite,
}

/// Epoch milliseconds become ISO strings; strings are trimmed.
fn normalize_row(row: &mut Value) {
    let Some(obj) = row.as_object_mut() else {
        return;
    };
    for key in DATE_FIELDS {
        let Some(v) = obj.get_mut(key) else {
            continue;
        };
        let millis = match v {
            Value::String(s) => {
                *s = s.trim().to_string();
                None
            }
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        if let Some(dt) = millis.and_then(DateTime::<Utc>::from_timestamp_millis) {
            *v = Value::String(fmt_datetime(&dt));
        }
    }
}

/// Check the candidate shape and read it into typed rows.
pub fn parse_bundle(candidate: &Value) -> AppResult<DataBundle> {
    let Some(obj) = candidate.as_object() else {
        return Err(AppError::InvalidFormat(
            "backup bundle must be a JSON object".into(),
        ));
    };

    let mut obj: Map<String, Value> = obj.clone();
    for key in TABLE_KEYS {
        if matches!(obj.get(key), Some(Value::Null)) {
            obj.remove(key);
            continue;
        }
        match obj.get_mut(key) {
            None => {}
            Some(Value::Array(rows)) => rows.iter_mut().for_each(normalize_row),
            Some(_) => {
                return Err(AppError::InvalidFormat(format!(
                    "bundle field '{}' must be an array",
                    key
                )));
            }
        }
    }

    let bundle: DataBundle = serde_json::from_value(Value::Object(obj))
        .map_err(|e| AppError::InvalidFormat(format!("backup bundle: {}", e)))?;

    if bundle.version > BUNDLE_VERSION {
        warning(format!(
            "Bundle version {} is newer than supported version {}; restoring anyway.",
            bundle.version, BUNDLE_VERSION
        ));
    }

    Ok(bundle)
}

/// Keep the most recent active session open and complete the others.
fn settle_active_sessions(sessions: &mut [Session]) -> usize {
    let latest = sessions
        .iter()
        .enumerate()
        .filter(|(_, s)| s.status.is_active())
        .max_by_key(|(_, s)| (s.start_time, s.id))
        .map(|(i, _)| i);

    let mut closed = 0;
    for (i, s) in sessions.iter_mut().enumerate() {
        if s.status.is_active() && Some(i) != latest {
            s.status = SessionStatus::Completed;
            if s.end_time.is_none() {
                // Left open when the duration does not fit a timestamp
                s.end_time = Duration::try_minutes(s.duration_minutes.max(0))
                    .and_then(|d| s.start_time.checked_add_signed(d));
            }
            closed += 1;
        }
    }
    closed
}

fn insert_all<R: Record>(conn: &Connection, rows: &[R]) -> AppResult<()> {
    for row in rows {
        R::validate_insert(conn, row)?;
        R::insert(conn, row)?;
    }
    Ok(())
}

fn replace_tables(conn: &mut Connection, bundle: &DataBundle) -> AppResult<()> {
    let tx = conn.transaction()?;

    tx.execute_batch(
        "DELETE FROM captures;
         DELETE FROM sessions;
         DELETE FROM competencies;
         DELETE FROM logs;",
    )?;

    insert_all(&tx, &bundle.sessions)?;
    insert_all(&tx, &bundle.captures)?;
    insert_all(&tx, &bundle.competencies)?;
    insert_all(&tx, &bundle.logs)?;

    crate::db::log::ttlog(
        &tx,
        "restore",
        "all",
        &format!(
            "Restored bundle v{} from {}: {} sessions, {} captures, {} competencies, {} logs",
            bundle.version,
            if bundle.timestamp.is_empty() {
                "?"
            } else {
                bundle.timestamp.as_str()
            },
            bundle.sessions.len(),
            bundle.captures.len(),
            bundle.competencies.len(),
            bundle.logs.len()
        ),
    )?;

    tx.commit()?;
    Ok(())
}

/// Profile writes are retried once; a second failure is reported, not raised.
fn write_profile(profiles: &dyn ProfileStore, profile: &Value) -> ProfileWrite {
    if !profile.is_object() {
        return ProfileWrite::Skipped;
    }
    match profiles.save(profile) {
        Ok(()) => ProfileWrite::Saved,
        Err(first) => {
            warning(format!("Profile write failed ({}); retrying once.", first));
            match profiles.save(profile) {
                Ok(()) => ProfileWrite::Saved,
                Err(e) => {
                    error(format!(
                        "Journal data restored, but the profile could not be saved: {}",
                        e
                    ));
                    ProfileWrite::Failed(e.to_string())
                }
            }
        }
    }
}

impl Store {
    /// Snapshot all four tables together with the profile document.
    pub fn create_bundle(&self, profiles: &dyn ProfileStore) -> AppResult<DataBundle> {
        Ok(DataBundle {
            version: BUNDLE_VERSION,
            timestamp: fmt_datetime(&Utc::now()),
            profile: profiles.load()?,
            sessions: self.all()?,
            captures: self.all()?,
            competencies: self.all()?,
            logs: self.all()?,
        })
    }

    /// Replace the whole journal with `candidate`.
    ///
    /// Tables are swapped in one transaction: on any failure nothing
    /// changes and the profile is left alone. The profile is written after
    /// the commit, so a failure there leaves restored tables next to the
    /// previous profile.
    pub fn restore_bundle(
        &mut self,
        candidate: &Value,
        profiles: &dyn ProfileStore,
    ) -> AppResult<RestoreReport> {
        let mut bundle = parse_bundle(candidate)?;

        let auto_completed = settle_active_sessions(&mut bundle.sessions);
        if auto_completed > 0 {
            warning(format!(
                "Bundle had {} extra active session(s); they were marked completed.",
                auto_completed
            ));
        }

        replace_tables(self.conn_mut()?, &bundle)
            .map_err(|e| AppError::TransactionFailure(e.to_string()))?;

        self.notify(&Table::ALL);

        let profile = write_profile(profiles, &bundle.profile);

        Ok(RestoreReport {
            sessions: bundle.sessions.len(),
            captures: bundle.captures.len(),
            competencies: bundle.competencies.len(),
            logs: bundle.logs.len(),
            auto_completed,
            profile,
        })
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

/// Write the bundle as pretty JSON, or as a single-entry `.zip` archive.
/// Returns the path actually written.
pub fn write_bundle(bundle: &DataBundle, dest: &Path, compress: bool) -> AppResult<PathBuf> {
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let json = bundle.to_json()?;

    if !compress {
        fs::write(dest, json)?;
        return Ok(dest.to_path_buf());
    }

    let zip_path = if is_zip(dest) {
        dest.to_path_buf()
    } else {
        dest.with_extension("zip")
    };
    let entry = zip_path
        .with_extension("json")
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "keeperlog-backup.json".to_string());

    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(entry, options).map_err(std::io::Error::other)?;
    zip.write_all(json.as_bytes())?;
    zip.finish().map_err(std::io::Error::other)?;

    Ok(zip_path)
}

/// Read a bundle file (plain JSON or a `.zip` holding one JSON entry).
pub fn read_bundle_file(path: &Path) -> AppResult<Value> {
    let mut bytes = Vec::new();
    fs::File::open(path)?.read_to_end(&mut bytes)?;

    let text = if bytes.starts_with(b"PK\x03\x04") {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
            .map_err(|e| AppError::InvalidFormat(format!("{}: {}", path.display(), e)))?;
        let mut found = None;
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| AppError::InvalidFormat(format!("{}: {}", path.display(), e)))?;
            if entry.name().to_lowercase().ends_with(".json") {
                let mut s = String::new();
                entry.read_to_string(&mut s)?;
                found = Some(s);
                break;
            }
        }
        found.ok_or_else(|| {
            AppError::InvalidFormat(format!("{}: no JSON entry in archive", path.display()))
        })?
    } else {
        String::from_utf8(bytes)
            .map_err(|e| AppError::InvalidFormat(format!("{}: {}", path.display(), e)))?
    };

    serde_json::from_str(&text)
        .map_err(|e| AppError::InvalidFormat(format!("{}: {}", path.display(), e)))
}
