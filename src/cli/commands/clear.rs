use crate::cli::commands::open_store;
use crate::config::Config;
use crate::core::backup::confirm;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cfg: &Config, force: bool) -> AppResult<()> {
    if !force {
        warning("This deletes every session, capture, competency and legacy log.");
        if !confirm("Clear the journal?")? {
            info("Nothing deleted.");
            return Ok(());
        }
    }

    let mut store = open_store(cfg)?;
    store.clear_all()?;
    success("Journal cleared.");
    Ok(())
}
