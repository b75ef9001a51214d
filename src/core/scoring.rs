//! Competency evidence matching and scoring.
//!
//! Pure functions over store snapshots: nothing here reads or writes the
//! database, so callers re-run them whenever sessions or captures change.

use crate::models::{Capture, Competency, Session};
use crate::utils::date::today;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const COVERAGE_POINTS: i64 = 20;
pub const DEPTH_BASE: i64 = 10;
pub const DEPTH_REFLECTION_BONUS: i64 = 10;
pub const DEPTH_MEDIA_BONUS: i64 = 5;
pub const DEPTH_MAX: i64 = 25;
pub const REFLECTION_DEPTH_CHARS: usize = 100;
pub const POINTS_PER_DAY: i64 = 5;
pub const CONSISTENCY_MAX: i64 = 25;
pub const MAX_SCORE: i64 = 100;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompetencyStatus {
    #[serde(rename = "Not started")]
    NotStarted,
    #[serde(rename = "In progress")]
    InProgress,
    Consistent,
    Strong,
}

impl CompetencyStatus {
    pub fn from_score(score: i64) -> Self {
        if score >= 80 {
            CompetencyStatus::Strong
        } else if score >= 50 {
            CompetencyStatus::Consistent
        } else if score >= 1 {
            CompetencyStatus::InProgress
        } else {
            CompetencyStatus::NotStarted
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompetencyStatus::NotStarted => "Not started",
            CompetencyStatus::InProgress => "In progress",
            CompetencyStatus::Consistent => "Consistent",
            CompetencyStatus::Strong => "Strong",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            CompetencyStatus::NotStarted => "No evidence logged yet.",
            CompetencyStatus::InProgress => "Some practice logged. Build consistency.",
            CompetencyStatus::Consistent => "Practised regularly across sessions.",
            CompetencyStatus::Strong => "Recent and consistent evidence logged.",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyScore {
    pub score: i64,
    pub coverage: i64,
    pub depth: i64,
    pub consistency: i64,
    pub recency: i64,
    pub confidence_points: i64,
    pub status: CompetencyStatus,
    pub status_message: &'static str,
    /// Relevant session ids, newest first.
    pub evidence: Vec<i64>,
}

impl CompetencyScore {
    pub fn not_started() -> Self {
        let status = CompetencyStatus::NotStarted;
        Self {
            score: 0,
            coverage: 0,
            depth: 0,
            consistency: 0,
            recency: 0,
            confidence_points: 0,
            status,
            status_message: status.message(),
            evidence: Vec::new(),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn british(s: &str) -> String {
    s.replace("behavior", "behaviour")
}

/// Fuzzy tag match: either string contains the other, compared
/// case-insensitively and with "behavior"/"behaviour" unified.
/// Blank tags never match.
pub fn tag_matches(tag: &str, code: &str) -> bool {
    let t = normalize(tag);
    let c = normalize(code);
    if t.is_empty() || c.is_empty() {
        return false;
    }
    if c.contains(&t) || t.contains(&c) {
        return true;
    }
    let (t_alt, c_alt) = (british(&t), british(&c));
    c_alt.contains(&t_alt) || t_alt.contains(&c_alt)
}

fn captures_by_session(captures: &[Capture]) -> HashMap<i64, Vec<&Capture>> {
    let mut map: HashMap<i64, Vec<&Capture>> = HashMap::new();
    for c in captures {
        map.entry(c.session_id).or_default().push(c);
    }
    map
}

fn is_relevant(code: &str, session: &Session, captures: &[&Capture]) -> bool {
    session.has_competency(code)
        || captures
            .iter()
            .any(|c| c.tags.iter().any(|tag| tag_matches(tag, code)))
}

/// Sessions that evidence `code`, newest first.
pub fn relevant_sessions<'a>(
    code: &str,
    sessions: &'a [Session],
    captures: &[Capture],
) -> Vec<&'a Session> {
    let by_session = captures_by_session(captures);
    let none = Vec::new();

    let mut out: Vec<&Session> = sessions
        .iter()
        .filter(|s| {
            let caps = s.id.and_then(|id| by_session.get(&id)).unwrap_or(&none);
            is_relevant(code, s, caps)
        })
        .collect();

    out.sort_by(|a, b| b.date.cmp(&a.date).then(b.start_time.cmp(&a.start_time)));
    out
}

pub fn recency_points(days_since: i64) -> i64 {
    match days_since {
        d if d <= 14 => 20,
        d if d <= 30 => 15,
        d if d <= 60 => 10,
        d if d <= 90 => 5,
        _ => 0,
    }
}

/// Score one competency as of `today`.
pub fn score_competency_on(
    code: &str,
    sessions: &[Session],
    captures: &[Capture],
    meta: Option<&Competency>,
    today: NaiveDate,
) -> CompetencyScore {
    if code.trim().is_empty() {
        return CompetencyScore::not_started();
    }

    let relevant = relevant_sessions(code, sessions, captures);
    let Some(latest) = relevant.first() else {
        return CompetencyScore::not_started();
    };

    let by_session = captures_by_session(captures);

    // Coverage: flat once any evidence exists
    let coverage = COVERAGE_POINTS;

    // Depth: best single session
    let depth = relevant
        .iter()
        .map(|s| {
            let mut points = DEPTH_BASE;
            if s.reflection.chars().count() > REFLECTION_DEPTH_CHARS {
                points += DEPTH_REFLECTION_BONUS;
            }
            let has_media = s
                .id
                .and_then(|id| by_session.get(&id))
                .is_some_and(|caps| caps.iter().any(|c| c.kind.is_rich_evidence()));
            if has_media {
                points += DEPTH_MEDIA_BONUS;
            }
            points
        })
        .max()
        .unwrap_or(0)
        .min(DEPTH_MAX);

    // Consistency: distinct calendar days
    let unique_days: HashSet<NaiveDate> = relevant.iter().map(|s| s.date).collect();
    let consistency = (unique_days.len() as i64 * POINTS_PER_DAY).min(CONSISTENCY_MAX);

    // Recency: from the newest relevant session
    let recency = recency_points((today - latest.date).num_days());

    // Confidence: self-rating 0–5 → 0–10
    let confidence_points = meta.map(|m| m.confidence_level()).unwrap_or(0) * 2;

    let score = (coverage + depth + consistency + recency + confidence_points).min(MAX_SCORE);
    let status = CompetencyStatus::from_score(score);

    CompetencyScore {
        score,
        coverage,
        depth,
        consistency,
        recency,
        confidence_points,
        status,
        status_message: status.message(),
        evidence: relevant.iter().filter_map(|s| s.id).collect(),
    }
}

/// Score one competency as of the local current date.
pub fn score_competency(
    code: &str,
    sessions: &[Session],
    captures: &[Capture],
    meta: Option<&Competency>,
) -> CompetencyScore {
    score_competency_on(code, sessions, captures, meta, today())
}
