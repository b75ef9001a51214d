use crate::cli::commands::open_store;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::migrate::current_version;
use crate::errors::AppResult;
use crate::models::Competency;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database with all migrations and the default competencies
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing keeperlog…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &cfg.database);

    let store = open_store(&cfg)?;
    let version = current_version(store.conn()?)?;
    let competencies = store.count::<Competency>()?;

    success(format!(
        "Database initialized at {} (schema v{}, {} competencies)",
        &cfg.database, version, competencies
    ));

    store.audit(
        "init",
        "database",
        &format!("Database initialized at {}", &cfg.database),
    );

    if competencies == 0 {
        warning("No competencies available; run `keeperlog competency reset` to install defaults.");
    }

    println!("🎉 keeperlog initialization completed!");
    Ok(())
}
