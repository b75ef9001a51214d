//! Unified application error type.
//! Store, codecs, scoring helpers and CLI handlers all return AppError so the
//! binary has a single place to present failures.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("{table} #{id} not found")]
    NotFound { table: &'static str, id: i64 },

    #[error("Restore aborted, store left unchanged: {0}")]
    TransactionFailure(String),

    // ---------------------------
    // Session / competency rules
    // ---------------------------
    #[error("Session #{0} is still active; complete it before starting another")]
    ActiveSessionExists(i64),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Competency '{0}' already exists")]
    DuplicateCompetency(String),

    // ---------------------------
    // Parsing / formats
    // ---------------------------
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
