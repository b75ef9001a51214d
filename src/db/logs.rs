use crate::db::record::{
    Record, Table, date_col, date_text, json_col, opt_datetime_col, opt_datetime_text, to_json,
};
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::models::LogEntry;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, Row, params};

impl Record for LogEntry {
    const TABLE: Table = Table::Logs;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn map_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(LogEntry {
            id: row.get("id")?,
            date: date_col(row, "date")?,
            duration_minutes: row.get("duration_minutes")?,
            facility: row.get("facility")?,
            activity_type: row.get("activity_type")?,
            notes: row.get("notes")?,
            reflection: row.get("reflection")?,
            competencies: json_col(row, "competencies")?,
            images: json_col(row, "images")?,
            created_at: opt_datetime_col(row, "created_at")?,
            updated_at: opt_datetime_col(row, "updated_at")?,
        })
    }

    fn insert(conn: &Connection, e: &Self) -> AppResult<i64> {
        conn.execute(
            "INSERT INTO logs (id, date, duration_minutes, facility, activity_type, notes,
                               reflection, competencies, images, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                e.id,
                date_text(&e.date),
                e.duration_minutes,
                e.facility,
                e.activity_type,
                e.notes,
                e.reflection,
                to_json(&e.competencies)?,
                e.images.as_ref().map(to_json).transpose()?,
                opt_datetime_text(&e.created_at),
                opt_datetime_text(&e.updated_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn write(conn: &Connection, id: i64, e: &Self) -> AppResult<()> {
        conn.execute(
            "UPDATE logs
             SET date = ?1, duration_minutes = ?2, facility = ?3, activity_type = ?4,
                 notes = ?5, reflection = ?6, competencies = ?7, images = ?8,
                 created_at = ?9, updated_at = ?10
             WHERE id = ?11",
            params![
                date_text(&e.date),
                e.duration_minutes,
                e.facility,
                e.activity_type,
                e.notes,
                e.reflection,
                to_json(&e.competencies)?,
                e.images.as_ref().map(to_json).transpose()?,
                opt_datetime_text(&e.created_at),
                opt_datetime_text(&e.updated_at),
                id,
            ],
        )?;
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

impl Store {
    /// Legacy entries dated within `[from, to]`, newest first.
    pub fn logs_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<LogEntry>> {
        self.query(
            "SELECT * FROM logs WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC, id DESC",
            params![date_text(&from), date_text(&to)],
        )
    }
}
