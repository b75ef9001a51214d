use keeperlog::errors::AppError;
use keeperlog::ui::messages::{error, hint};
use std::process::ExitCode;

fn main() -> ExitCode {
    match keeperlog::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error(format!("Error: {}", e));
            if matches!(e, AppError::StorageUnavailable(_)) {
                hint("Run `keeperlog init` to create the journal.");
            }
            ExitCode::FAILURE
        }
    }
}
