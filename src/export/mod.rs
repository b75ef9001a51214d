//! Everything that leaves or enters the journal as a file: the session CSV
//! dialect, the backup bundle, the progress report and the writers behind them.

pub mod bundle;
pub mod csv;
pub mod logic;
pub mod report;
mod writer;

pub use bundle::{DataBundle, ProfileWrite, RestoreReport};
pub use logic::ExportLogic;
pub(crate) use writer::ensure_writable;

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Tag used in the audit trail and the last-export stamp.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}
