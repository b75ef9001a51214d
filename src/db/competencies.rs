use crate::db::record::{Record, Table};
use crate::db::store::Store;
use crate::errors::{AppError, AppResult};
use crate::models::Competency;
use crate::models::competency::MAX_CONFIDENCE;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::json;

/// Id of a competency with the same code (case-insensitive), other than `except`.
fn code_taken(conn: &Connection, code: &str, except: Option<i64>) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM competencies WHERE code = ?1 COLLATE NOCASE AND id != ?2 LIMIT 1",
            params![code.trim(), except.unwrap_or(-1)],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn check(conn: &Connection, c: &Competency) -> AppResult<()> {
    if c.code.trim().is_empty() {
        return Err(AppError::InvalidFormat("competency code is required".into()));
    }
    if let Some(conf) = c.confidence
        && !(0..=MAX_CONFIDENCE).contains(&conf)
    {
        return Err(AppError::InvalidFormat(format!(
            "confidence must be between 0 and {} (got {})",
            MAX_CONFIDENCE, conf
        )));
    }
    if code_taken(conn, &c.code, c.id)?.is_some() {
        return Err(AppError::DuplicateCompetency(c.code.trim().to_string()));
    }
    Ok(())
}

impl Record for Competency {
    const TABLE: Table = Table::Competencies;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn map_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Competency {
            id: row.get("id")?,
            code: row.get("code")?,
            description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
            category: row.get::<_, Option<String>>("category")?.unwrap_or_default(),
            active: row.get::<_, Option<i64>>("active")?.map(|v| v != 0),
            order: row.get("sort_order")?,
            confidence: row.get("confidence")?,
            seed_version: row.get("seed_version")?,
        })
    }

    fn insert(conn: &Connection, c: &Self) -> AppResult<i64> {
        conn.execute(
            "INSERT INTO competencies (id, code, description, category, active, sort_order,
                                       confidence, seed_version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                c.id,
                c.code.trim(),
                c.description,
                c.category,
                c.active.map(i64::from),
                c.order,
                c.confidence,
                c.seed_version,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn write(conn: &Connection, id: i64, c: &Self) -> AppResult<()> {
        conn.execute(
            "UPDATE competencies
             SET code = ?1, description = ?2, category = ?3, active = ?4, sort_order = ?5,
                 confidence = ?6, seed_version = ?7
             WHERE id = ?8",
            params![
                c.code.trim(),
                c.description,
                c.category,
                c.active.map(i64::from),
                c.order,
                c.confidence,
                c.seed_version,
                id,
            ],
        )?;
        Ok(())
    }

    fn validate_insert(conn: &Connection, c: &Self) -> AppResult<()> {
        check(conn, c)
    }

    fn validate_update(conn: &Connection, _old: &Self, new: &Self) -> AppResult<()> {
        check(conn, new)
    }
}

impl Store {
    /// Competencies in display order (sort key, then id). Rows that predate
    /// the `active` column count as active.
    pub fn competencies(&self, active_only: bool) -> AppResult<Vec<Competency>> {
        let sql = if active_only {
            "SELECT * FROM competencies WHERE active IS NULL OR active != 0
             ORDER BY sort_order IS NULL, sort_order ASC, id ASC"
        } else {
            "SELECT * FROM competencies ORDER BY sort_order IS NULL, sort_order ASC, id ASC"
        };
        self.query(sql, [])
    }

    pub fn competency_by_code(&self, code: &str) -> AppResult<Option<Competency>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT * FROM competencies WHERE code = ?1 COLLATE NOCASE",
                [code.trim()],
                Competency::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Append a user-defined competency after the current last position.
    pub fn add_competency(&mut self, code: &str, description: &str, category: &str) -> AppResult<i64> {
        let next_order: i64 = self.conn()?.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM competencies",
            [],
            |row| row.get(0),
        )?;

        let mut c = Competency::new(code, description, category);
        c.order = Some(next_order);
        self.add(&c)
    }

    pub fn set_confidence(&mut self, id: i64, level: i64) -> AppResult<Competency> {
        self.update(id, &json!({ "confidence": level }))
    }

    /// Soft delete / restore visibility.
    pub fn set_competency_active(&mut self, id: i64, active: bool) -> AppResult<Competency> {
        self.update(id, &json!({ "active": active }))
    }
}
