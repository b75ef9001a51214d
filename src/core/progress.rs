use crate::core::scoring::{CompetencyScore, score_competency_on};
use crate::errors::AppError;
use crate::models::{Capture, Competency, Session};
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

pub const GAP_BELOW: i64 = 30;
pub const STRONG_FROM: i64 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillFilter {
    #[default]
    All,
    Gaps,
    Improving,
    Strong,
}

impl SkillFilter {
    pub fn accepts(&self, score: i64) -> bool {
        match self {
            SkillFilter::All => true,
            SkillFilter::Gaps => score < GAP_BELOW,
            SkillFilter::Improving => (GAP_BELOW..STRONG_FROM).contains(&score),
            SkillFilter::Strong => score >= STRONG_FROM,
        }
    }
}

impl FromStr for SkillFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(SkillFilter::All),
            "gaps" => Ok(SkillFilter::Gaps),
            "improving" => Ok(SkillFilter::Improving),
            "strong" => Ok(SkillFilter::Strong),
            other => Err(AppError::InvalidFormat(format!(
                "unknown skill filter '{}' (all, gaps, improving, strong)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRow {
    pub competency: Competency,
    pub stats: CompetencyScore,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsOverview {
    pub rows: Vec<SkillRow>,
    pub covered: usize,
    pub total: usize,
    /// Percentage of active competencies with any evidence.
    pub coverage: i64,
}

/// Score every active competency, then apply `filter` and `search`.
///
/// Coverage is computed over all active competencies, before filtering.
pub fn skills_overview(
    competencies: &[Competency],
    sessions: &[Session],
    captures: &[Capture],
    filter: SkillFilter,
    search: Option<&str>,
    today: NaiveDate,
) -> SkillsOverview {
    let scored: Vec<SkillRow> = competencies
        .iter()
        .filter(|c| c.is_active())
        .map(|c| SkillRow {
            stats: score_competency_on(&c.code, sessions, captures, Some(c), today),
            competency: c.clone(),
        })
        .collect();

    let total = scored.len();
    let covered = scored.iter().filter(|r| r.stats.score > 0).count();
    let coverage = if total > 0 {
        ((covered as f64 / total as f64) * 100.0).round() as i64
    } else {
        0
    };

    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut rows: Vec<SkillRow> = scored
        .into_iter()
        .filter(|r| filter.accepts(r.stats.score))
        .filter(|r| match &needle {
            Some(n) => {
                r.competency.code.to_lowercase().contains(n)
                    || r.competency.category.to_lowercase().contains(n)
            }
            None => true,
        })
        .collect();

    rows.sort_by_key(|r| r.competency.code.to_lowercase());

    SkillsOverview {
        rows,
        covered,
        total,
        coverage,
    }
}
