use crate::core::backup::confirm;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::ui::messages::{info, success};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Make sure `path` may be written: parent directories are created and an
/// existing file is only replaced with `force` or after the user agrees.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    if !path.exists() || force {
        return Ok(());
    }

    if confirm(&format!("'{}' already exists. Overwrite?", path.display()))? {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "'{}' exists and was not overwritten (use --force)",
            path.display()
        )))
    }
}

/// Destination of one export run.
pub(crate) struct Output {
    path: PathBuf,
    format: ExportFormat,
}

impl Output {
    pub(crate) fn new(path: &Path, format: ExportFormat) -> Self {
        Self {
            path: path.to_path_buf(),
            format,
        }
    }

    /// Pretty-printed JSON document.
    pub(crate) fn json<T: Serialize + ?Sized>(&self, data: &T, records: usize) -> AppResult<()> {
        let body = serde_json::to_string_pretty(data)?;
        self.write(body.as_bytes(), records)
    }

    /// CSV with the header taken from the row type's field names.
    pub(crate) fn csv_rows<T: Serialize>(&self, rows: &[T]) -> AppResult<()> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row)
                .map_err(|e| AppError::Export(format!("CSV row: {e}")))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Export(format!("CSV buffer: {e}")))?;
        self.write(&bytes, rows.len())
    }

    /// Text that is already in its final dialect.
    pub(crate) fn text(&self, text: &str, records: usize) -> AppResult<()> {
        self.write(text.as_bytes(), records)
    }

    fn write(&self, bytes: &[u8], records: usize) -> AppResult<()> {
        info(format!(
            "Writing {} {} record(s) to {}",
            records,
            self.format.label(),
            self.path.display()
        ));
        fs::write(&self.path, bytes)?;
        success(format!(
            "{} export completed: {}",
            self.format.label(),
            self.path.display()
        ));
        Ok(())
    }
}
