use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::export::bundle::{read_bundle_file, write_bundle};
use crate::export::logic::record_export;
use crate::export::{ProfileWrite, RestoreReport, ensure_writable};
use crate::profile::ProfileStore;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use std::io::{self, Write};
use std::path::PathBuf;

/// y/N prompt on stdin.
pub fn confirm(question: &str) -> AppResult<bool> {
    print!("{} [y/N]: ", question);
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

pub struct BackupLogic;

impl BackupLogic {
    /// Write a full bundle to `dest_file`, optionally zipped.
    pub fn backup(
        store: &Store,
        profiles: &dyn ProfileStore,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        let dest = expand_tilde(dest_file);
        let target = if compress && !dest.extension().is_some_and(|e| e == "zip") {
            dest.with_extension("zip")
        } else {
            dest.clone()
        };
        ensure_writable(&target, force)?;

        let bundle = store.create_bundle(profiles)?;
        let written = write_bundle(&bundle, &dest, compress)?;

        success(format!(
            "Backup created: {} ({} sessions, {} captures, {} competencies, {} logs)",
            written.display(),
            bundle.sessions.len(),
            bundle.captures.len(),
            bundle.competencies.len(),
            bundle.logs.len()
        ));
        if compress {
            info(format!("📦 Compressed: {}", written.display()));
        }

        store.audit(
            "backup",
            &written.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );
        record_export(store, "backup");

        Ok(written)
    }

    /// Replace the journal with the bundle stored in `src_file`.
    ///
    /// Without `force` the user must confirm, since every table is replaced.
    pub fn restore(
        store: &mut Store,
        profiles: &dyn ProfileStore,
        src_file: &str,
        force: bool,
    ) -> AppResult<Option<RestoreReport>> {
        let src = expand_tilde(src_file);
        if !src.exists() {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Backup not found: {}", src.display()),
            )));
        }

        let candidate = read_bundle_file(&src)?;

        if !force {
            warning("Restoring replaces ALL sessions, captures, competencies and logs.");
            if !confirm("Continue?")? {
                info("Restore cancelled by user.");
                return Ok(None);
            }
        }

        let report = store.restore_bundle(&candidate, profiles)?;

        success(format!(
            "Restored {} sessions, {} captures, {} competencies, {} logs from {}",
            report.sessions,
            report.captures,
            report.competencies,
            report.logs,
            src.display()
        ));
        if report.profile == ProfileWrite::Saved {
            info("Profile restored.");
        }

        Ok(Some(report))
    }
}
