use serde::{Deserialize, Serialize};

/// Highest self-rating a student can give a competency.
pub const MAX_CONFIDENCE: i64 = 5;

/// A tracked skill area. `code` is the display label and natural key.
///
/// `active`, `order` and `confidence` arrived in a later schema revision;
/// rows written before that read back as `None` and are resolved through
/// the accessor methods below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Competency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<i64>,
    /// Version of the default catalogue this row was seeded from.
    /// `None` marks a user-created competency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_version: Option<i64>,
}

impl Competency {
    pub fn new(code: &str, description: &str, category: &str) -> Self {
        Self {
            id: None,
            code: code.trim().to_string(),
            description: description.to_string(),
            category: category.to_string(),
            active: Some(true),
            order: None,
            confidence: None,
            seed_version: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    pub fn sort_key(&self) -> i64 {
        self.order.unwrap_or(i64::MAX)
    }

    /// Self-rating clamped to 0..=5.
    pub fn confidence_level(&self) -> i64 {
        self.confidence.unwrap_or(0).clamp(0, MAX_CONFIDENCE)
    }

    pub fn is_user_defined(&self) -> bool {
        self.seed_version.is_none()
    }
}
