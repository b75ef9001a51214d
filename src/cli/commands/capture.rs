use crate::cli::commands::{open_store, session_or_active};
use crate::cli::parser::{CaptureAction, CaptureTypeArg, Commands};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::{Capture, CaptureType};
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{GREY, colorize_optional, paint};
use crate::utils::formatting::first_line;
use crate::utils::table::{Column, Table};
use chrono::Local;

impl From<CaptureTypeArg> for CaptureType {
    fn from(arg: CaptureTypeArg) -> Self {
        match arg {
            CaptureTypeArg::Text => CaptureType::Text,
            CaptureTypeArg::Observation => CaptureType::Observation,
            CaptureTypeArg::Photo => CaptureType::Photo,
            CaptureTypeArg::Voice => CaptureType::Voice,
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Capture { action } = cmd else {
        return Ok(());
    };

    match action {
        CaptureAction::Add {
            content,
            session,
            kind,
            tags,
            media,
            share,
            private,
        } => {
            let kind = CaptureType::from(*kind);
            if content.as_deref().is_none_or(|c| c.trim().is_empty()) && media.is_none() {
                return Err(AppError::InvalidFormat(
                    "a capture needs content or --media".into(),
                ));
            }

            let mut store = open_store(cfg)?;
            let owner = session_or_active(&store, *session)?;
            let session_id = owner.id.unwrap_or_default();

            let mut capture = Capture::new(session_id, kind, content.clone());
            capture.tags = tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            capture.media_url = media.clone();
            capture.include_in_export = match (share, private) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };

            let id = store.add(&capture)?;
            store.audit(
                "add",
                &format!("capture #{}", id),
                &format!("{} capture added to session #{}", kind.to_db_str(), session_id),
            );

            success(format!(
                "Capture #{} ({}) added to session #{}",
                id,
                kind.to_db_str(),
                session_id
            ));
            if !capture.exportable() {
                info("This capture stays private in exported reports (use --share to include it).");
            }
        }

        CaptureAction::List { session } => {
            let store = open_store(cfg)?;
            let owner = session_or_active(&store, *session)?;
            let session_id = owner.id.unwrap_or_default();
            let captures = store.captures_for_session(session_id)?;

            if captures.is_empty() {
                info(format!("Session #{} has no captures.", session_id));
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 6),
                Column::new("Time", 5),
                Column::new("Type", 11),
                Column::new("Content", 48),
                Column::new("Tags", 30),
                Column::new("Export", 6),
            ]);

            for c in &captures {
                let content = match (&c.content, &c.media_url) {
                    (Some(text), _) if !text.trim().is_empty() => first_line(text).to_string(),
                    (_, Some(_)) => "[media]".to_string(),
                    _ => "-".to_string(),
                };
                table.add_row(vec![
                    c.id.unwrap_or_default().to_string(),
                    c.timestamp.with_timezone(&Local).format("%H:%M").to_string(),
                    c.kind.to_db_str().to_string(),
                    content,
                    colorize_optional(&if c.tags.is_empty() {
                        "-".to_string()
                    } else {
                        c.tags.join(", ")
                    }),
                    if c.exportable() {
                        "yes".to_string()
                    } else {
                        paint(GREY, "no")
                    },
                ]);
            }

            print!("{}", table.render());
        }

        CaptureAction::Delete { id } => {
            let mut store = open_store(cfg)?;
            match store.delete::<Capture>(*id) {
                Ok(()) => {
                    store.audit("delete", &format!("capture #{}", id), "Capture deleted");
                    success(format!("Capture #{} deleted.", id));
                }
                Err(AppError::NotFound { .. }) => {
                    warning(format!("Capture #{} not found.", id));
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}
