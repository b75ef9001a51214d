use crate::cli::commands::open_store;
use crate::cli::parser::{Commands, ExportWhat};
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Export {
            what,
            format,
            file,
            range,
            force,
        } => {
            let store = open_store(cfg)?;
            match what {
                ExportWhat::Sessions => {
                    ExportLogic::export_sessions(&store, *format, file, range, *force)?
                }
                ExportWhat::Report => {
                    if range.is_some() {
                        warning("--range is ignored for the progress report.");
                    }
                    ExportLogic::export_report(&store, *format, file, *force)?
                }
            }
        }
        Commands::Import { file } => {
            let mut store = open_store(cfg)?;
            let report = ExportLogic::import_sessions(&mut store, file)?;
            success(format!(
                "Imported {} session(s) from {}",
                report.imported, file
            ));
            if report.skipped > 0 {
                warning(format!("{} row(s) skipped.", report.skipped));
            }
        }
        _ => {}
    }
    Ok(())
}
