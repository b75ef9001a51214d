use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::Store;
use crate::db::migrate::{SCHEMA_VERSION, current_version};
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, hint, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    if !(*migrate || *check || *vacuum || *show_info) {
        hint("Nothing to do: pass --migrate, --check, --vacuum or --info.");
        return Ok(());
    }

    // Migrations run as part of opening the store
    let store = open_store(cfg)?;

    if *migrate {
        report_schema(&store)?;
    }
    if *show_info {
        stats::print_db_info(&store)?;
    }
    if *check {
        check_integrity(&store)?;
    }
    if *vacuum {
        info("Compacting the journal database...");
        store.vacuum()?;
        success("Vacuum completed.");
    }
    Ok(())
}

fn report_schema(store: &Store) -> AppResult<()> {
    let version = current_version(store.conn()?)?;
    if version >= SCHEMA_VERSION {
        success(format!("Schema is up to date (v{}).", version));
    } else {
        error(format!(
            "Schema stopped at v{} while v{} is expected.",
            version, SCHEMA_VERSION
        ));
    }
    Ok(())
}

fn check_integrity(store: &Store) -> AppResult<()> {
    let verdict = store.integrity_check()?;
    if verdict == "ok" {
        success("Integrity check passed.");
    } else {
        error(format!("Integrity check failed: {}", verdict));
    }
    Ok(())
}
