pub mod backup;
pub mod capture;
pub mod clear;
pub mod competency;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod log;
pub mod profile;
pub mod session;
pub mod skills;
pub mod stats;

use crate::config::Config;
use crate::db::{Store, StoreOptions};
use crate::errors::{AppError, AppResult};
use crate::models::{Competency, Session};
use crate::profile::{FileProfileStore, ProfileStore, UserProfile};
use crate::utils::path::{ensure_parent, expand_tilde};

/// Open the configured journal, creating and migrating it when needed.
pub(crate) fn open_store(cfg: &Config) -> AppResult<Store> {
    let path = expand_tilde(&cfg.database);
    ensure_parent(&path)?;
    Store::open_with(
        &path.to_string_lossy(),
        StoreOptions {
            seed_defaults: true,
            seed_threshold: cfg.seed_threshold,
        },
    )
}

pub(crate) fn profile_store(cfg: &Config) -> FileProfileStore {
    FileProfileStore::new(expand_tilde(&cfg.profile_file))
}

pub(crate) fn load_profile(cfg: &Config) -> AppResult<UserProfile> {
    Ok(UserProfile::from_value(&profile_store(cfg).load()?))
}

/// The given session, or the active one when no id is passed.
pub(crate) fn session_or_active(store: &Store, id: Option<i64>) -> AppResult<Session> {
    match id {
        Some(id) => store.get(id),
        None => store.active_session()?.ok_or_else(|| {
            AppError::InvalidTransition(
                "no active session; pass a session id or run `session start`".into(),
            )
        }),
    }
}

/// Resolve a competency by numeric id or by code (case-insensitive).
pub(crate) fn resolve_competency(store: &Store, target: &str) -> AppResult<Competency> {
    if let Ok(id) = target.trim().parse::<i64>() {
        return store.get(id);
    }
    store.competency_by_code(target)?.ok_or_else(|| {
        AppError::InvalidFormat(format!("no competency with code '{}'", target.trim()))
    })
}
