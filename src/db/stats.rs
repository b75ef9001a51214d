use crate::db::migrate::current_version;
use crate::db::record::Table;
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(store: &Store) -> AppResult<()> {
    let conn = store.conn()?;
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(store.path()).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, store.path(), RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!("{}• Schema:{} v{}", CYAN, RESET, current_version(conn)?);

    //
    // 2) ROWS PER TABLE
    //
    for table in Table::ALL {
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        println!(
            "{}• {}:{} {}{}{}",
            CYAN,
            table.name(),
            RESET,
            GREEN,
            count,
            RESET
        );
    }

    //
    // 3) SESSION DATE RANGE
    //
    let first_date: Option<String> = conn
        .query_row(
            "SELECT date FROM sessions ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = conn
        .query_row(
            "SELECT date FROM sessions ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Session range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}

impl Store {
    /// `PRAGMA integrity_check` result ("ok" when healthy).
    pub fn integrity_check(&self) -> AppResult<String> {
        Ok(self
            .conn()?
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?)
    }

    pub fn vacuum(&self) -> AppResult<()> {
        self.conn()?.execute_batch("VACUUM;")?;
        Ok(())
    }

    pub fn audit_entries(&self) -> AppResult<Vec<crate::db::log::AuditEntry>> {
        crate::db::log::load_audit(self.conn()?)
    }

    pub fn last_audit(&self, operation: &str) -> AppResult<Option<crate::db::log::AuditEntry>> {
        crate::db::log::last_audit(self.conn()?, operation)
    }
}
