use crate::utils::date::{flexible_date, flexible_datetime, flexible_datetime_opt};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle of a placement day. `Completed` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SessionStatus::Active),
            "completed" => Some(SessionStatus::Completed),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

/// One placement day/shift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate, // ⇔ sessions.date (TEXT "YYYY-MM-DD")
    #[serde(with = "flexible_datetime")]
    pub start_time: DateTime<Utc>,
    #[serde(
        default,
        with = "flexible_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: i64,
    pub facility: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub status: SessionStatus,

    #[serde(default)]
    pub reflection: String,
    /// prompt text → answer text
    #[serde(default)]
    pub reflection_prompts: BTreeMap<String, String>,
    /// competency labels, compared case-insensitively
    #[serde(default)]
    pub competencies: Vec<String>,

    #[serde(with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "flexible_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// A freshly started session: `active`, zero duration, no reflection yet.
    pub fn start(date: NaiveDate, start_time: DateTime<Utc>, facility: &str) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            date,
            start_time,
            end_time: None,
            duration_minutes: 0,
            facility: facility.to_string(),
            supervisor: None,
            supervisor_note: None,
            role: None,
            area: None,
            status: SessionStatus::Active,
            reflection: String::new(),
            reflection_prompts: BTreeMap::new(),
            competencies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Case/whitespace-insensitive membership test on the session's competency labels.
    pub fn has_competency(&self, code: &str) -> bool {
        let wanted = code.trim().to_lowercase();
        self.competencies
            .iter()
            .any(|c| c.trim().to_lowercase() == wanted)
    }
}
