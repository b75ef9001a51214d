use crate::core::progress::{SkillFilter, skills_overview};
use crate::core::stats::ExportStamp;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::csv::{ImportReport, sessions_to_csv};
use crate::export::writer::{Output, ensure_writable};
use crate::export::report::report_rows;
use crate::models::{Capture, Session};
use crate::ui::messages::warning;
use crate::utils::date::{period_bounds, today};
use crate::utils::path::expand_tilde;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;

/// Shareable journal: sessions plus the captures cleared for export.
#[derive(Serialize)]
struct JournalExport<'a> {
    sessions: &'a [Session],
    captures: Vec<&'a Capture>,
}

/// High-level export/import entry points used by the CLI.
pub struct ExportLogic;

impl ExportLogic {
    /// Export sessions.
    ///
    /// - `format`: "csv" (fixed 9-column dialect) | "json" (sessions + captures)
    /// - `range`: `None`, `"all"` or a period expression:
    ///   - `YYYY`
    ///   - `YYYY-MM`
    ///   - `YYYY-MM-DD`
    ///   - `A:B` with A and B any of the above
    pub fn export_sessions(
        store: &Store,
        format: ExportFormat,
        file: &str,
        range: &Option<String>,
        force: bool,
    ) -> AppResult<()> {
        let path = expand_tilde(file);
        ensure_writable(&path, force)?;

        let sessions = match range {
            None => store.sessions_newest_first()?,
            Some(r) if r.eq_ignore_ascii_case("all") => store.sessions_newest_first()?,
            Some(r) => {
                let (from, to) = period_bounds(r).map_err(AppError::InvalidDate)?;
                store.sessions_between(from, to)?
            }
        };

        if sessions.is_empty() {
            warning("No sessions found for selected range.");
            return Ok(());
        }

        let out = Output::new(&path, format);
        match format {
            ExportFormat::Csv => out.text(&sessions_to_csv(&sessions), sessions.len())?,
            ExportFormat::Json => {
                let mut captures = Vec::new();
                for s in &sessions {
                    if let Some(id) = s.id {
                        captures.extend(store.captures_for_session(id)?);
                    }
                }
                let shared: Vec<&Capture> = captures.iter().filter(|c| c.exportable()).collect();
                let withheld = captures.len() - shared.len();
                if withheld > 0 {
                    warning(format!(
                        "{} private capture(s) left out of the export.",
                        withheld
                    ));
                }
                out.json(
                    &JournalExport {
                        sessions: &sessions,
                        captures: shared,
                    },
                    sessions.len(),
                )?
            }
        }

        record_export(store, &format!("sessions ({})", format.as_str()));
        Ok(())
    }

    /// Export the per-competency progress report.
    pub fn export_report(
        store: &Store,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<()> {
        let path = expand_tilde(file);
        ensure_writable(&path, force)?;

        let overview = skills_overview(
            &store.competencies(true)?,
            &store.all::<Session>()?,
            &store.all::<Capture>()?,
            SkillFilter::All,
            None,
            today(),
        );
        let rows = report_rows(&overview.rows);

        let out = Output::new(&path, format);
        match format {
            ExportFormat::Csv => out.csv_rows(&rows)?,
            ExportFormat::Json => out.json(&rows, rows.len())?,
        }

        record_export(store, &format!("progress report ({})", format.as_str()));
        Ok(())
    }

    /// Import sessions from a CSV file in the export dialect.
    pub fn import_sessions(store: &mut Store, file: &str) -> AppResult<ImportReport> {
        let path = expand_tilde(file);
        let text = fs::read_to_string(&path)?;
        store.import_sessions_csv(&text)
    }
}

/// Remember when an export happened and how many sessions existed then.
pub fn record_export(store: &Store, what: &str) {
    match store.count::<Session>() {
        Ok(n) => store.audit("export", &n.to_string(), &format!("Exported {}", what)),
        Err(e) => warning(format!("Could not record export: {}", e)),
    }
}

/// The most recent export stamp, if any export was recorded.
pub fn last_export(store: &Store) -> AppResult<Option<ExportStamp>> {
    let Some(entry) = store.last_audit("export")? else {
        return Ok(None);
    };

    let date = DateTime::parse_from_rfc3339(&entry.date)
        .map(|dt| dt.with_timezone(&Local).date_naive())
        .map_err(|e| AppError::ParseFailure(format!("audit date '{}': {}", entry.date, e)))?;

    Ok(Some(ExportStamp {
        date,
        session_count: entry.target.trim().parse().unwrap_or(0),
    }))
}
