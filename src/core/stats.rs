use crate::models::Session;
use crate::utils::date::week_start;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PeriodStats {
    pub count: usize,
    pub minutes: i64,
}

impl PeriodStats {
    fn add(&mut self, s: &Session) {
        self.count += 1;
        self.minutes += s.duration_minutes.max(0);
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub week_start: NaiveDate,
    pub week: PeriodStats,
    pub total: PeriodStats,
}

/// Count and minutes for the week containing `today` (Monday start) and all time.
pub fn session_stats(sessions: &[Session], today: NaiveDate) -> SessionStats {
    let start = week_start(today);
    let mut week = PeriodStats::default();
    let mut total = PeriodStats::default();

    for s in sessions {
        total.add(s);
        if s.date >= start {
            week.add(s);
        }
    }

    SessionStats {
        week_start: start,
        week,
        total,
    }
}

/// Hours logged against a target, as a whole percentage capped at 100.
pub fn target_progress(minutes: i64, target_hours: i64) -> i64 {
    if target_hours <= 0 {
        return 0;
    }
    let pct = (minutes as f64 / (target_hours as f64 * 60.0)) * 100.0;
    (pct.floor() as i64).clamp(0, 100)
}

/// When a backup or export last happened and how many sessions existed then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportStamp {
    pub date: NaiveDate,
    pub session_count: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct ReminderPolicy {
    pub max_sessions: i64,
    pub max_days: i64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            max_sessions: 5,
            max_days: 7,
        }
    }
}

/// Nudge when too many sessions or too many days have piled up since the
/// last export. A journal that was never exported counts as very stale.
pub fn export_due(
    session_count: i64,
    last: Option<ExportStamp>,
    today: NaiveDate,
    policy: ReminderPolicy,
) -> bool {
    let (days_since, count_then) = match last {
        Some(stamp) => ((today - stamp.date).num_days(), stamp.session_count),
        None => (i64::MAX, 0),
    };
    let sessions_since = session_count - count_then;

    sessions_since > policy.max_sessions || (days_since > policy.max_days && session_count > 0)
}
