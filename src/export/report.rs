// src/export/report.rs

use crate::core::badges::BadgeTier;
use crate::core::progress::SkillRow;
use serde::Serialize;

/// One line of the progress report. Field order is the CSV column order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReportRow {
    pub competency: String,
    pub category: String,
    pub score: i64,
    pub status: String,
    pub tier: String,
    pub coverage: i64,
    pub depth: i64,
    pub consistency: i64,
    pub recency: i64,
    pub confidence: i64,
    pub evidence_sessions: usize,
}

impl From<&SkillRow> for ReportRow {
    fn from(r: &SkillRow) -> Self {
        Self {
            competency: r.competency.code.clone(),
            category: r.competency.category.clone(),
            score: r.stats.score,
            status: r.stats.status.label().to_string(),
            tier: BadgeTier::for_score(r.stats.score).label().to_string(),
            coverage: r.stats.coverage,
            depth: r.stats.depth,
            consistency: r.stats.consistency,
            recency: r.stats.recency,
            confidence: r.competency.confidence_level(),
            evidence_sessions: r.stats.evidence.len(),
        }
    }
}

pub fn report_rows(rows: &[SkillRow]) -> Vec<ReportRow> {
    rows.iter().map(ReportRow::from).collect()
}
