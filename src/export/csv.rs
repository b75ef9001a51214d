// src/export/csv.rs

use crate::db::Store;
use crate::db::sessions::compose_reflection;
use crate::errors::{AppError, AppResult};
use crate::models::{Session, SessionStatus};
use crate::ui::messages::warning;
use crate::utils::date::{DATE_FMT, local_midnight, parse_date};
use chrono::{Duration, Utc};
use std::collections::BTreeMap;
use std::mem;

/// The four guided reflection prompts, in column order.
pub const REFLECTION_PROMPTS: [&str; 4] = [
    "What did you observe or assist with today?",
    "Why was it done that way? (Rationale)",
    "What did you learn or understand better?",
    "What would you do differently or watch for next time?",
];

pub const CSV_HEADER: &str = "Date,Facility,Supervisor,Role,Duration (mins),\
Q1: What did you observe?,Q2: Why was it done that way?,\
Q3: What did you learn?,Q4: What would you do differently?";

pub const CSV_COLUMNS: usize = 9;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Answer for prompt `i`: the full prompt text is the key, with `Q1`..`Q4`
/// accepted as shorthand.
fn answer(s: &Session, i: usize) -> &str {
    s.reflection_prompts
        .get(REFLECTION_PROMPTS[i])
        .or_else(|| s.reflection_prompts.get(&format!("Q{}", i + 1)))
        .map(String::as_str)
        .unwrap_or("")
}

/// One CSV line per session. Embedded newlines stay inside their quotes.
pub fn sessions_to_csv(sessions: &[Session]) -> String {
    let mut lines = Vec::with_capacity(sessions.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for s in sessions {
        let mut cols = vec![
            s.date.format(DATE_FMT).to_string(),
            quote(&s.facility),
            quote(s.supervisor.as_deref().unwrap_or("")),
            quote(s.role.as_deref().unwrap_or("")),
            s.duration_minutes.to_string(),
        ];
        cols.extend((0..REFLECTION_PROMPTS.len()).map(|i| quote(answer(s, i))));
        lines.push(cols.join(","));
    }

    lines.join("\n")
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|f| !f.is_empty()) {
        rows.push(row);
    }
}

/// Split CSV text into rows of fields.
///
/// Commas and line breaks only separate outside quotes; `""` inside a quoted
/// field is a literal quote. `\r\n` counts as one line break. Rows whose
/// fields are all empty are dropped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => row.push(mem::take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(mem::take(&mut field));
                push_row(&mut rows, mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }

    rows
}

/// Leading integer of a duration cell: `"125.5"` and `"125 mins"` read as
/// 125, a cell without digits as 0.
fn leading_minutes(cell: &str) -> AppResult<i64> {
    let cell = cell.trim();
    let sign_len = usize::from(cell.starts_with(['-', '+']));
    let digits = cell[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(cell.len(), |end| sign_len + end);
    if digits == sign_len {
        return Ok(0);
    }
    cell[..digits]
        .parse::<i64>()
        .map_err(|_| AppError::ParseFailure(format!("duration '{}' out of range", cell)))
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Build a completed session from one data row.
pub fn session_from_row(row: &[String]) -> AppResult<Session> {
    if row.len() < CSV_COLUMNS {
        return Err(AppError::ParseFailure(format!(
            "expected {} columns, found {}",
            CSV_COLUMNS,
            row.len()
        )));
    }

    let date = parse_date(&row[0])
        .ok_or_else(|| AppError::ParseFailure(format!("invalid date '{}'", row[0])))?;
    let facility = row[1].trim();
    if facility.is_empty() {
        return Err(AppError::ParseFailure("facility is required".into()));
    }
    let duration = leading_minutes(&row[4])?;

    let prompts: BTreeMap<String, String> = REFLECTION_PROMPTS
        .iter()
        .zip(&row[5..CSV_COLUMNS])
        .map(|(p, a)| (p.to_string(), a.clone()))
        .collect();

    let start = local_midnight(date);
    let end = Duration::try_minutes(duration.max(0))
        .and_then(|d| start.checked_add_signed(d))
        .ok_or_else(|| AppError::ParseFailure(format!("duration {} out of range", duration)))?;

    let mut s = Session::start(date, start, facility);
    s.status = SessionStatus::Completed;
    s.end_time = Some(end);
    s.duration_minutes = duration;
    s.supervisor = non_empty(&row[2]);
    s.role = non_empty(&row[3]);
    s.reflection_prompts = prompts;
    if s.reflection_prompts.values().any(|a| !a.trim().is_empty()) {
        s.reflection = compose_reflection(&s);
    }
    s.updated_at = Utc::now();
    Ok(s)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based position among the data rows (header excluded).
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CsvImport {
    pub sessions: Vec<Session>,
    pub skipped: Vec<SkippedRow>,
}

/// Parse a whole CSV export. Bad rows are collected, never fatal.
pub fn sessions_from_csv(text: &str) -> CsvImport {
    let mut out = CsvImport::default();

    for (i, row) in parse_rows(text).iter().enumerate().skip(1) {
        match session_from_row(row) {
            Ok(s) => out.sessions.push(s),
            Err(e) => out.skipped.push(SkippedRow {
                row: i,
                reason: e.to_string(),
            }),
        }
    }

    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

impl Store {
    /// Add every valid CSV row as a new completed session. Existing sessions
    /// are kept. Fails when no row could be imported.
    pub fn import_sessions_csv(&mut self, text: &str) -> AppResult<ImportReport> {
        let parsed = sessions_from_csv(text);

        for skip in &parsed.skipped {
            warning(format!("Skipping CSV row {}: {}", skip.row, skip.reason));
        }

        if parsed.sessions.is_empty() {
            return Err(AppError::InvalidFormat(
                "no valid session rows found in CSV".into(),
            ));
        }

        let ids = self.bulk_add(&parsed.sessions)?;
        self.audit(
            "import",
            "sessions",
            &format!(
                "Imported {} sessions from CSV ({} skipped)",
                ids.len(),
                parsed.skipped.len()
            ),
        );

        Ok(ImportReport {
            imported: ids.len(),
            skipped: parsed.skipped.len(),
        })
    }
}
