use crate::cli::commands::{load_profile, open_store};
use crate::config::Config;
use crate::core::stats::{ReminderPolicy, export_due, session_stats, target_progress};
use crate::errors::AppResult;
use crate::export::logic::last_export;
use crate::models::Session;
use crate::ui::messages::{header, warning};
use crate::utils::date::today;
use crate::utils::formatting::{bold, mins2readable, score_bar};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let sessions = store.all::<Session>()?;
    let day = today();
    let stats = session_stats(&sessions, day);

    header("Placement statistics");
    println!(
        "This week (since {}) : {} session(s), {}",
        stats.week_start.format("%Y-%m-%d"),
        stats.week.count,
        mins2readable(stats.week.minutes)
    );
    println!(
        "All time              : {} session(s), {}",
        stats.total.count,
        bold(&mins2readable(stats.total.minutes))
    );

    let profile = load_profile(cfg)?;
    if let Some(target) = profile.target_hours.filter(|h| *h > 0) {
        let pct = target_progress(stats.total.minutes, target);
        println!(
            "Target ({}h)          : {} {}%",
            target,
            score_bar(pct, 20),
            pct
        );
    }

    let policy = ReminderPolicy {
        max_sessions: cfg.export_reminder_sessions,
        max_days: cfg.export_reminder_days,
    };
    let last = last_export(&store)?;
    if export_due(sessions.len() as i64, last, day, policy) {
        let since = match last {
            Some(stamp) => format!("since {}", stamp.date.format("%Y-%m-%d")),
            None => "yet".to_string(),
        };
        warning(format!(
            "Your journal has not been backed up {}. Run `keeperlog backup --file <path>`.",
            since
        ));
    }
    Ok(())
}
