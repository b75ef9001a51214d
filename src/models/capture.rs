use crate::utils::date::flexible_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaptureType {
    Text,
    Observation,
    Photo,
    Voice,
}

impl CaptureType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CaptureType::Text => "text",
            CaptureType::Observation => "observation",
            CaptureType::Photo => "photo",
            CaptureType::Voice => "voice",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "note" => Some(CaptureType::Text),
            "observation" => Some(CaptureType::Observation),
            "photo" => Some(CaptureType::Photo),
            "voice" => Some(CaptureType::Voice),
            _ => None,
        }
    }

    /// Photos and observations count as richer evidence when scoring depth.
    pub fn is_rich_evidence(&self) -> bool {
        matches!(self, CaptureType::Photo | CaptureType::Observation)
    }
}

/// A timestamped artifact recorded during a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Capture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub session_id: i64,
    #[serde(with = "flexible_datetime")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: CaptureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// inline-encoded media payload (data URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_in_export: Option<bool>,
}

impl Capture {
    pub fn new(session_id: i64, kind: CaptureType, content: Option<String>) -> Self {
        Self {
            id: None,
            session_id,
            timestamp: Utc::now(),
            kind,
            content,
            tags: Vec::new(),
            media_url: None,
            include_in_export: None,
        }
    }

    /// Privacy gate for human-readable reports: photos stay private unless
    /// the user opted in; other capture types are included by default.
    pub fn exportable(&self) -> bool {
        self.include_in_export
            .unwrap_or(!matches!(self.kind, CaptureType::Photo))
    }
}
