use crate::cli::commands::{open_store, profile_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Backup {
            file,
            compress,
            force,
        } => {
            let store = open_store(cfg)?;
            BackupLogic::backup(&store, &profile_store(cfg), file, *compress, *force)?;
        }
        Commands::Restore { file, force } => {
            let mut store = open_store(cfg)?;
            BackupLogic::restore(&mut store, &profile_store(cfg), file, *force)?;
        }
        _ => {}
    }

    Ok(())
}
