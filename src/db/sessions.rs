use crate::db::record::{
    Record, Table, date_col, date_text, datetime_col, json_col, opt_datetime_col,
    opt_datetime_text, to_json,
};
use crate::db::store::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{Session, SessionStatus};
use crate::utils::date::fmt_datetime;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn status_col(row: &Row) -> rusqlite::Result<SessionStatus> {
    let raw: String = row.get("status")?;
    SessionStatus::from_db_str(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::ParseFailure(format!("Invalid session status: {}", raw))),
        )
    })
}

/// Id of the active session other than `except`, if one exists.
fn other_active_session(conn: &Connection, except: Option<i64>) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM sessions
             WHERE status = 'active' AND id != ?1
             ORDER BY id ASC LIMIT 1",
            [except.unwrap_or(-1)],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

impl Record for Session {
    const TABLE: Table = Table::Sessions;
    const CASCADES: &'static [Table] = &[Table::Captures];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn map_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Session {
            id: row.get("id")?,
            date: date_col(row, "date")?,
            start_time: datetime_col(row, "start_time")?,
            end_time: opt_datetime_col(row, "end_time")?,
            duration_minutes: row.get("duration_minutes")?,
            facility: row.get("facility")?,
            supervisor: row.get("supervisor")?,
            supervisor_note: row.get("supervisor_note")?,
            role: row.get("role")?,
            area: row.get("area")?,
            status: status_col(row)?,
            reflection: row.get::<_, Option<String>>("reflection")?.unwrap_or_default(),
            reflection_prompts: json_col(row, "reflection_prompts")?,
            competencies: json_col(row, "competencies")?,
            created_at: datetime_col(row, "created_at")?,
            updated_at: datetime_col(row, "updated_at")?,
        })
    }

    fn insert(conn: &Connection, s: &Self) -> AppResult<i64> {
        conn.execute(
            "INSERT INTO sessions (id, date, start_time, end_time, duration_minutes, facility,
                                   supervisor, supervisor_note, role, area, status, reflection,
                                   reflection_prompts, competencies, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                s.id,
                date_text(&s.date),
                fmt_datetime(&s.start_time),
                opt_datetime_text(&s.end_time),
                s.duration_minutes,
                s.facility,
                s.supervisor,
                s.supervisor_note,
                s.role,
                s.area,
                s.status.to_db_str(),
                s.reflection,
                to_json(&s.reflection_prompts)?,
                to_json(&s.competencies)?,
                fmt_datetime(&s.created_at),
                fmt_datetime(&s.updated_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn write(conn: &Connection, id: i64, s: &Self) -> AppResult<()> {
        conn.execute(
            "UPDATE sessions
             SET date = ?1, start_time = ?2, end_time = ?3, duration_minutes = ?4,
                 facility = ?5, supervisor = ?6, supervisor_note = ?7, role = ?8, area = ?9,
                 status = ?10, reflection = ?11, reflection_prompts = ?12,
                 competencies = ?13, created_at = ?14, updated_at = ?15
             WHERE id = ?16",
            params![
                date_text(&s.date),
                fmt_datetime(&s.start_time),
                opt_datetime_text(&s.end_time),
                s.duration_minutes,
                s.facility,
                s.supervisor,
                s.supervisor_note,
                s.role,
                s.area,
                s.status.to_db_str(),
                s.reflection,
                to_json(&s.reflection_prompts)?,
                to_json(&s.competencies)?,
                fmt_datetime(&s.created_at),
                fmt_datetime(&s.updated_at),
                id,
            ],
        )?;
        Ok(())
    }

    /// At most one session may be active.
    fn validate_insert(conn: &Connection, s: &Self) -> AppResult<()> {
        if s.facility.trim().is_empty() {
            return Err(AppError::InvalidFormat("facility is required".into()));
        }
        if s.status.is_active()
            && let Some(active) = other_active_session(conn, s.id)?
        {
            return Err(AppError::ActiveSessionExists(active));
        }
        Ok(())
    }

    fn validate_update(conn: &Connection, old: &Self, new: &Self) -> AppResult<()> {
        if old.status == SessionStatus::Completed && new.status == SessionStatus::Active {
            return Err(AppError::InvalidTransition(format!(
                "session #{} is completed and cannot be reopened",
                old.id.unwrap_or_default()
            )));
        }
        if new.status.is_active()
            && let Some(active) = other_active_session(conn, old.id)?
        {
            return Err(AppError::ActiveSessionExists(active));
        }
        Ok(())
    }

    fn delete_owned(conn: &Connection, owner: Option<i64>) -> AppResult<()> {
        match owner {
            Some(id) => conn.execute("DELETE FROM captures WHERE session_id = ?1", [id])?,
            None => conn.execute("DELETE FROM captures", [])?,
        };
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields recorded when a session is finalized.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub reflection: Option<String>,
    pub reflection_prompts: Vec<(String, String)>,
    pub competencies: Vec<String>,
    pub supervisor: Option<String>,
    pub supervisor_note: Option<String>,
}

impl Store {
    /// Sessions dated within `[from, to]`, newest first.
    pub fn sessions_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Session>> {
        self.query(
            "SELECT * FROM sessions WHERE date BETWEEN ?1 AND ?2
             ORDER BY date DESC, start_time DESC",
            params![date_text(&from), date_text(&to)],
        )
    }

    /// Every session, newest first.
    pub fn sessions_newest_first(&self) -> AppResult<Vec<Session>> {
        self.query(
            "SELECT * FROM sessions ORDER BY date DESC, start_time DESC",
            [],
        )
    }

    pub fn sessions_by_status(&self, status: SessionStatus) -> AppResult<Vec<Session>> {
        self.query(
            "SELECT * FROM sessions WHERE status = ?1 ORDER BY date DESC, start_time DESC",
            [status.to_db_str()],
        )
    }

    pub fn active_session(&self) -> AppResult<Option<Session>> {
        Ok(self
            .sessions_by_status(SessionStatus::Active)?
            .into_iter()
            .next())
    }

    /// Start a new placement day. Fails while another session is active.
    pub fn start_session(&mut self, session: &Session) -> AppResult<i64> {
        let mut s = session.clone();
        s.status = SessionStatus::Active;
        self.add(&s)
    }

    /// Transition an active session to `completed`.
    ///
    /// The duration defaults to the minutes between start and end.
    pub fn complete_session(&mut self, id: i64, done: Completion) -> AppResult<Session> {
        let mut s: Session = self.get(id)?;
        if s.status == SessionStatus::Completed {
            return Err(AppError::InvalidTransition(format!(
                "session #{} is already completed",
                id
            )));
        }

        let end = done.end_time.unwrap_or_else(Utc::now);
        if end < s.start_time {
            return Err(AppError::InvalidFormat(format!(
                "end time {} is before start time {}",
                fmt_datetime(&end),
                fmt_datetime(&s.start_time)
            )));
        }

        s.end_time = Some(end);
        s.duration_minutes = done
            .duration_minutes
            .unwrap_or_else(|| (end - s.start_time).num_minutes());
        s.status = SessionStatus::Completed;

        for (prompt, answer) in done.reflection_prompts {
            s.reflection_prompts.insert(prompt, answer);
        }
        s.reflection = match done.reflection {
            Some(text) => text,
            None if s.reflection_prompts.is_empty() => s.reflection.clone(),
            None => compose_reflection(&s),
        };
        for c in done.competencies {
            if !s.has_competency(&c) {
                s.competencies.push(c.trim().to_string());
            }
        }
        if done.supervisor.is_some() {
            s.supervisor = done.supervisor;
        }
        if done.supervisor_note.is_some() {
            s.supervisor_note = done.supervisor_note;
        }

        self.replace(&s)?;
        self.get(id)
    }
}

/// Flatten prompt answers into the free-text reflection (`**prompt**\nanswer` blocks).
pub(crate) fn compose_reflection(s: &Session) -> String {
    crate::export::csv::REFLECTION_PROMPTS
        .iter()
        .filter_map(|p| s.reflection_prompts.get(*p).map(|a| (p, a)))
        .map(|(p, a)| format!("**{}**\n{}", p, if a.is_empty() { "-" } else { a }))
        .collect::<Vec<_>>()
        .join("\n\n")
}
