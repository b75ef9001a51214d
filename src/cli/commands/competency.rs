use crate::cli::commands::{open_store, resolve_competency};
use crate::cli::parser::{Commands, CompetencyAction};
use crate::config::Config;
use crate::core::backup::confirm;
use crate::errors::{AppError, AppResult};
use crate::models::Competency;
use crate::models::competency::MAX_CONFIDENCE;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, paint};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Competency { action } = cmd else {
        return Ok(());
    };

    let mut store = open_store(cfg)?;

    match action {
        CompetencyAction::List { all } => {
            let list = store.competencies(!*all)?;
            if list.is_empty() {
                info("No competencies. Run `keeperlog competency reset` to install the defaults.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 5),
                Column::new("Competency", 44),
                Column::new("Category", 12),
                Column::new("Confidence", 10),
                Column::new("Description", 50),
            ]);
            for c in &list {
                let stars = format!(
                    "{}{}",
                    "★".repeat(c.confidence_level() as usize),
                    "☆".repeat((MAX_CONFIDENCE - c.confidence_level()) as usize)
                );
                let code = if c.is_active() {
                    c.code.clone()
                } else {
                    paint(GREY, &format!("{} (hidden)", c.code))
                };
                table.add_row(vec![
                    c.id.unwrap_or_default().to_string(),
                    code,
                    c.category.clone(),
                    stars,
                    c.description.clone(),
                ]);
            }
            print!("{}", table.render());
        }

        CompetencyAction::Add {
            code,
            description,
            category,
        } => {
            let id = store.add_competency(code, description, category)?;
            store.audit("add", &format!("competency #{}", id), code.trim());
            success(format!("Competency #{} added: {}", id, code.trim()));
        }

        CompetencyAction::Rate { target, level } => {
            if !(0..=MAX_CONFIDENCE).contains(level) {
                return Err(AppError::InvalidFormat(format!(
                    "confidence must be between 0 and {}",
                    MAX_CONFIDENCE
                )));
            }
            let c = resolve_competency(&store, target)?;
            let updated = store.set_confidence(c.id.unwrap_or_default(), *level)?;
            store.audit(
                "update",
                &format!("competency #{}", c.id.unwrap_or_default()),
                &format!("Confidence set to {}", level),
            );
            success(format!(
                "Confidence for '{}' set to {}/{}",
                updated.code, level, MAX_CONFIDENCE
            ));
        }

        CompetencyAction::Hide { target } | CompetencyAction::Show { target } => {
            let visible = matches!(action, CompetencyAction::Show { .. });
            let c = resolve_competency(&store, target)?;
            let updated: Competency =
                store.set_competency_active(c.id.unwrap_or_default(), visible)?;
            store.audit(
                "update",
                &format!("competency #{}", c.id.unwrap_or_default()),
                if visible { "Competency shown" } else { "Competency hidden" },
            );
            success(format!(
                "'{}' is now {}.",
                updated.code,
                if visible { "visible" } else { "hidden" }
            ));
        }

        CompetencyAction::Reset { force } => {
            if !*force
                && !confirm("Replace ALL competencies (including your own) with the defaults?")?
            {
                info("Reset cancelled.");
                return Ok(());
            }
            let n = store.reset_competencies()?;
            info(format!("{} default competencies installed.", n));
        }
    }

    Ok(())
}
