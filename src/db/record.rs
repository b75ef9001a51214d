//! Row abstraction shared by the four journal tables.
//!
//! Each model implements [`Record`] so the store can offer one generic
//! CRUD surface (get / add / update / delete / bulk_add / clear / all)
//! while table-specific rules plug in through the validation hooks.

use crate::errors::{AppError, AppResult};
use crate::utils::date::{self, DATE_FMT};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Sessions,
    Captures,
    Competencies,
    Logs,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Sessions,
        Table::Captures,
        Table::Competencies,
        Table::Logs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Sessions => "sessions",
            Table::Captures => "captures",
            Table::Competencies => "competencies",
            Table::Logs => "logs",
        }
    }

    /// Singular label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Table::Sessions => "session",
            Table::Captures => "capture",
            Table::Competencies => "competency",
            Table::Logs => "log entry",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait Record: Serialize + DeserializeOwned + Clone {
    const TABLE: Table;

    /// Tables whose rows disappear together with a row of this table.
    const CASCADES: &'static [Table] = &[];

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: i64);

    fn map_row(row: &Row) -> rusqlite::Result<Self>;

    /// Insert the row, keeping its id when one is set. Returns the row id.
    fn insert(conn: &Connection, rec: &Self) -> AppResult<i64>;

    /// Overwrite every column of row `id`.
    fn write(conn: &Connection, id: i64, rec: &Self) -> AppResult<()>;

    fn validate_insert(_conn: &Connection, _rec: &Self) -> AppResult<()> {
        Ok(())
    }

    fn validate_update(_conn: &Connection, _old: &Self, _new: &Self) -> AppResult<()> {
        Ok(())
    }

    /// Remove rows owned by `owner` (every owned row when `None`).
    fn delete_owned(_conn: &Connection, _owner: Option<i64>) -> AppResult<()> {
        Ok(())
    }

    /// Refresh bookkeeping fields (e.g. `updatedAt`) before an update is written.
    fn touch(&mut self) {}

    fn not_found(id: i64) -> AppError {
        AppError::NotFound {
            table: Self::TABLE.label(),
            id,
        }
    }
}

// ---------------------------------------------------------------------------
// Column helpers
// ---------------------------------------------------------------------------

fn conversion_error(col: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        Type::Text,
        Box::new(AppError::ParseFailure(format!(
            "column '{}' holds unreadable value '{}'",
            col, value
        ))),
    )
}

pub(crate) fn date_col(row: &Row, col: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(col)?;
    date::parse_flexible_date(&raw).ok_or_else(|| conversion_error(col, &raw))
}

pub(crate) fn datetime_col(row: &Row, col: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    date::parse_datetime(&raw).ok_or_else(|| conversion_error(col, &raw))
}

pub(crate) fn opt_datetime_col(row: &Row, col: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(None),
        Some(s) => date::parse_datetime(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(col, &s)),
    }
}

/// JSON-encoded column. NULL and empty text read as `T::default()`.
pub(crate) fn json_col<T: DeserializeOwned + Default>(row: &Row, col: &str) -> rusqlite::Result<T> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(T::default()),
        Some(s) if s.trim().is_empty() => Ok(T::default()),
        Some(s) => serde_json::from_str(&s).map_err(|_| conversion_error(col, &s)),
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string(value)?)
}

pub(crate) fn date_text(d: &NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

pub(crate) fn opt_datetime_text(dt: &Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(date::fmt_datetime)
}
