use crate::db::record::{Record, Table, datetime_col, json_col, to_json};
use crate::db::store::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{Capture, CaptureType};
use crate::utils::date::fmt_datetime;
use rusqlite::{Connection, Row, params};

fn kind_col(row: &Row) -> rusqlite::Result<CaptureType> {
    let raw: String = row.get("type")?;
    CaptureType::from_db_str(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::ParseFailure(format!("Invalid capture type: {}", raw))),
        )
    })
}

fn session_exists(conn: &Connection, id: i64) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM sessions WHERE id = ?1")?;
    Ok(stmt.exists([id])?)
}

impl Record for Capture {
    const TABLE: Table = Table::Captures;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn map_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Capture {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            timestamp: datetime_col(row, "timestamp")?,
            kind: kind_col(row)?,
            content: row.get("content")?,
            tags: json_col(row, "tags")?,
            media_url: row.get("media_url")?,
            include_in_export: row
                .get::<_, Option<i64>>("include_in_export")?
                .map(|v| v != 0),
        })
    }

    fn insert(conn: &Connection, c: &Self) -> AppResult<i64> {
        conn.execute(
            "INSERT INTO captures (id, session_id, timestamp, type, content, tags, media_url,
                                   include_in_export)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                c.id,
                c.session_id,
                fmt_datetime(&c.timestamp),
                c.kind.to_db_str(),
                c.content,
                to_json(&c.tags)?,
                c.media_url,
                c.include_in_export.map(i64::from),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn write(conn: &Connection, id: i64, c: &Self) -> AppResult<()> {
        conn.execute(
            "UPDATE captures
             SET session_id = ?1, timestamp = ?2, type = ?3, content = ?4, tags = ?5,
                 media_url = ?6, include_in_export = ?7
             WHERE id = ?8",
            params![
                c.session_id,
                fmt_datetime(&c.timestamp),
                c.kind.to_db_str(),
                c.content,
                to_json(&c.tags)?,
                c.media_url,
                c.include_in_export.map(i64::from),
                id,
            ],
        )?;
        Ok(())
    }

    /// Captures must belong to an existing session.
    fn validate_insert(conn: &Connection, c: &Self) -> AppResult<()> {
        if !session_exists(conn, c.session_id)? {
            return Err(AppError::NotFound {
                table: Table::Sessions.label(),
                id: c.session_id,
            });
        }
        Ok(())
    }

    fn validate_update(conn: &Connection, _old: &Self, new: &Self) -> AppResult<()> {
        Self::validate_insert(conn, new)
    }
}

impl Store {
    /// Captures of one session in chronological order.
    pub fn captures_for_session(&self, session_id: i64) -> AppResult<Vec<Capture>> {
        self.query(
            "SELECT * FROM captures WHERE session_id = ?1 ORDER BY timestamp ASC, id ASC",
            [session_id],
        )
    }

    pub fn captures_by_type(&self, kind: CaptureType) -> AppResult<Vec<Capture>> {
        self.query(
            "SELECT * FROM captures WHERE type = ?1 ORDER BY timestamp DESC",
            [kind.to_db_str()],
        )
    }
}
