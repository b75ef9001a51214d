//! User profile storage, kept outside the SQLite store.
//!
//! The bundle codec only sees the profile as an opaque JSON value; the CLI
//! reads the typed [`UserProfile`] view of the same document.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub default_facility: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_hours: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection_length: Option<String>,
    /// Keys this version does not know about, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn from_value(v: &Value) -> Self {
        serde_json::from_value(v.clone()).unwrap_or_default()
    }

    pub fn to_value(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Where the profile document lives.
pub trait ProfileStore {
    /// The stored profile, or an empty object when none was saved yet.
    fn load(&self) -> AppResult<Value>;
    fn save(&self, profile: &Value) -> AppResult<()>;
}

/// JSON file next to the configuration.
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self) -> AppResult<Value> {
        if !self.path.exists() {
            return Ok(Value::Object(Map::new()));
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&content).map_err(|e| {
            AppError::InvalidFormat(format!("profile {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, profile: &Value) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(profile)?)?;
        Ok(())
    }
}

/// Process-local profile, for embedding and tests.
#[derive(Default)]
pub struct MemoryProfileStore {
    value: RefCell<Option<Value>>,
}

impl MemoryProfileStore {
    pub fn with(profile: Value) -> Self {
        Self {
            value: RefCell::new(Some(profile)),
        }
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> AppResult<Value> {
        Ok(self
            .value
            .borrow()
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    fn save(&self, profile: &Value) -> AppResult<()> {
        *self.value.borrow_mut() = Some(profile.clone());
        Ok(())
    }
}
