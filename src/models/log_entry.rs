use crate::utils::date::{flexible_date, flexible_datetime_opt};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Pre-session journal entry. Superseded by Session/Capture but still
/// readable, writable and carried through backups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub facility: String,
    #[serde(default)]
    pub activity_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub competencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(
        default,
        with = "flexible_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "flexible_datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}
