use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;
use crate::ui::messages::hint;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Log { print: true } => LogLogic::print_log(&open_store(cfg)?),
        Commands::Log { print: false } => {
            hint("Use `keeperlog log --print` to show the audit trail.");
            Ok(())
        }
        _ => Ok(()),
    }
}
