use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

/// Overrides the configuration directory (used by integration tests).
pub const HOME_ENV: &str = "KEEPERLOG_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_profile_file")]
    pub profile_file: String,
    #[serde(default = "default_seed_threshold")]
    pub seed_threshold: usize,
    #[serde(default = "default_reflection_length")]
    pub reflection_length: String,
    #[serde(default = "default_reminder_sessions")]
    pub export_reminder_sessions: i64,
    #[serde(default = "default_reminder_days")]
    pub export_reminder_days: i64,
}

fn default_profile_file() -> String {
    Config::profile_path().to_string_lossy().to_string()
}
fn default_seed_threshold() -> usize {
    crate::db::store::DEFAULT_SEED_THRESHOLD
}
fn default_reflection_length() -> String {
    "standard".to_string()
}
fn default_reminder_sessions() -> i64 {
    5
}
fn default_reminder_days() -> i64 {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            profile_file: default_profile_file(),
            seed_threshold: default_seed_threshold(),
            reflection_length: default_reflection_length(),
            export_reminder_sessions: default_reminder_sessions(),
            export_reminder_days: default_reminder_days(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(HOME_ENV)
            && !dir.trim().is_empty()
        {
            return PathBuf::from(dir);
        }
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("keeperlog")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".keeperlog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("keeperlog.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("keeperlog.sqlite")
    }

    pub fn profile_path() -> PathBuf {
        Self::config_dir().join("profile.json")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// `--db` values: absolute paths are kept, bare names live in the config dir.
    pub fn resolve_database(name: &str) -> PathBuf {
        let p = crate::utils::path::expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Initialize configuration and database paths.
    ///
    /// Returns the resolved config; the database itself is created when the
    /// store is first opened.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_name {
            Some(name) => Self::resolve_database(&name),
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            config.save_to(&Self::config_file())?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        Ok(config)
    }

    /// Reflection mode: `short` keeps the observation and learning prompts only.
    pub fn short_reflection(&self) -> bool {
        self.reflection_length.eq_ignore_ascii_case("short")
    }
}
