//! Schema versioning.
//!
//! The schema version lives in `PRAGMA user_version`; every applied step is
//! also recorded in `audit_log` as `migration_applied`. Steps are additive:
//! columns added later are nullable and resolved at read time.

use crate::db::log::{AUDIT_TABLE_SQL, ttlog};
use crate::db::seed::DEFAULT_COMPETENCIES;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, Transaction};

pub const SCHEMA_VERSION: i64 = 2;

fn schema_version(conn: &Connection) -> AppResult<i64> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Check whether `table` has a column named `column`.
fn has_column(conn: &Connection, table: &str, column: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// v1: the four journal tables.
fn create_base_tables(tx: &Transaction) -> AppResult<()> {
    tx.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            date               TEXT NOT NULL,
            start_time         TEXT NOT NULL,
            end_time           TEXT,
            duration_minutes   INTEGER NOT NULL DEFAULT 0,
            facility           TEXT NOT NULL,
            supervisor         TEXT,
            supervisor_note    TEXT,
            role               TEXT,
            area               TEXT,
            status             TEXT NOT NULL CHECK(status IN ('active','completed')),
            reflection         TEXT NOT NULL DEFAULT '',
            reflection_prompts TEXT NOT NULL DEFAULT '{}',
            competencies       TEXT NOT NULL DEFAULT '[]',
            created_at         TEXT NOT NULL,
            updated_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
        CREATE INDEX IF NOT EXISTS idx_sessions_status ON sessions(status);
        CREATE INDEX IF NOT EXISTS idx_sessions_facility ON sessions(facility);

        CREATE TABLE IF NOT EXISTS captures (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id        INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            timestamp         TEXT NOT NULL,
            type              TEXT NOT NULL CHECK(type IN ('text','observation','photo','voice')),
            content           TEXT,
            tags              TEXT NOT NULL DEFAULT '[]',
            media_url         TEXT,
            include_in_export INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_captures_session ON captures(session_id);
        CREATE INDEX IF NOT EXISTS idx_captures_timestamp ON captures(timestamp);

        CREATE TABLE IF NOT EXISTS competencies (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            code        TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            category    TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS logs (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            date             TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL DEFAULT 0,
            facility         TEXT NOT NULL DEFAULT '',
            activity_type    TEXT NOT NULL DEFAULT '',
            notes            TEXT NOT NULL DEFAULT '',
            reflection       TEXT NOT NULL DEFAULT '',
            competencies     TEXT NOT NULL DEFAULT '[]',
            images           TEXT,
            created_at       TEXT,
            updated_at       TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_logs_date ON logs(date);
        "#,
    )?;
    Ok(())
}

/// v2: competency visibility, ordering, self-rating and seed tagging.
fn extend_competencies(tx: &Transaction) -> AppResult<()> {
    for (column, decl) in [
        ("active", "INTEGER"),
        ("sort_order", "INTEGER"),
        ("confidence", "INTEGER"),
        ("seed_version", "INTEGER"),
    ] {
        if !has_column(tx, "competencies", column)? {
            tx.execute(
                &format!("ALTER TABLE competencies ADD COLUMN {} {}", column, decl),
                [],
            )?;
        }
    }

    // Rows matching the first default catalogue were seeded by v1.
    for def in DEFAULT_COMPETENCIES {
        tx.execute(
            "UPDATE competencies SET seed_version = 1
             WHERE seed_version IS NULL AND code = ?1 COLLATE NOCASE",
            [def.code],
        )?;
    }

    // Duplicate codes cannot coexist with the unique index; keep the oldest row.
    tx.execute(
        "DELETE FROM competencies WHERE id NOT IN (
             SELECT MIN(id) FROM competencies GROUP BY code COLLATE NOCASE
         )",
        [],
    )?;

    tx.execute_batch(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_competencies_code
            ON competencies(code COLLATE NOCASE);
        CREATE INDEX IF NOT EXISTS idx_competencies_active ON competencies(active);
        CREATE INDEX IF NOT EXISTS idx_competencies_order ON competencies(sort_order);
        "#,
    )?;
    Ok(())
}

fn apply_migration(tx: &Transaction, version: i64) -> AppResult<&'static str> {
    match version {
        1 => {
            create_base_tables(tx)?;
            Ok("Created sessions, captures, competencies and logs tables")
        }
        2 => {
            extend_competencies(tx)?;
            Ok("Added active, sort_order, confidence and seed_version to competencies")
        }
        other => Err(AppError::Migration(format!(
            "no migration defined for schema v{}",
            other
        ))),
    }
}

/// Public entry point: run all pending migrations.
///
/// Invoked by `Store::open`. A database written by a newer build is refused
/// so a stale binary never writes into a schema it does not understand.
pub fn run_pending_migrations(conn: &mut Connection) -> AppResult<()> {
    conn.execute_batch(AUDIT_TABLE_SQL)?;

    let mut version = schema_version(conn)?;

    if version > SCHEMA_VERSION {
        return Err(AppError::Migration(format!(
            "database schema v{} is newer than supported v{}",
            version, SCHEMA_VERSION
        )));
    }

    if version == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;

    while version < SCHEMA_VERSION {
        let next = version + 1;
        let message = apply_migration(&tx, next)
            .map_err(|e| AppError::Migration(format!("migration to v{} failed: {}", next, e)))?;

        ttlog(&tx, "migration_applied", &format!("schema_v{}", next), message)?;
        version = next;
    }

    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    success(format!("Database schema upgraded to v{}.", SCHEMA_VERSION));
    Ok(())
}

pub fn current_version(conn: &Connection) -> AppResult<i64> {
    schema_version(conn)
}
