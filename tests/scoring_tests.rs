use keeperlog::core::scoring::{
    CompetencyStatus, recency_points, relevant_sessions, score_competency_on, tag_matches,
};
use keeperlog::models::{CaptureType, Competency};

mod common;
use common::{capture, completed_session, date};

const WHS: &str = "Workplace health and safety (WHS)";

fn rated(level: i64) -> Competency {
    let mut c = Competency::new(WHS, "", "Core");
    c.confidence = Some(level);
    c
}

#[test]
fn test_whs_example_scores_76_consistent() {
    let mut s = completed_session(1, date(2024, 3, 1), &[WHS]);
    s.reflection = "x".repeat(150);
    let captures = vec![capture(1, CaptureType::Photo, &[])];

    let stats = score_competency_on(WHS, &[s], &captures, Some(&rated(3)), date(2024, 3, 11));

    assert_eq!(stats.coverage, 20);
    assert_eq!(stats.depth, 25);
    assert_eq!(stats.consistency, 5);
    assert_eq!(stats.recency, 20);
    assert_eq!(stats.confidence_points, 6);
    assert_eq!(stats.score, 76);
    assert_eq!(stats.status, CompetencyStatus::Consistent);
    assert_eq!(stats.evidence, vec![1]);
}

#[test]
fn test_no_evidence_is_not_started() {
    let s = completed_session(1, date(2024, 3, 1), &["Safe handling and restraint"]);
    let stats = score_competency_on(WHS, &[s], &[], Some(&rated(5)), date(2024, 3, 2));

    assert_eq!(stats.score, 0);
    assert_eq!(stats.status, CompetencyStatus::NotStarted);
    assert!(stats.evidence.is_empty());
}

#[test]
fn test_each_confidence_step_adds_two_points() {
    let sessions = vec![completed_session(1, date(2024, 3, 1), &[WHS])];
    let today = date(2024, 3, 2);

    let base = score_competency_on(WHS, &sessions, &[], Some(&rated(0)), today).score;
    for level in 1..=5 {
        let s = score_competency_on(WHS, &sessions, &[], Some(&rated(level)), today).score;
        assert_eq!(s, base + level * 2);
    }
}

#[test]
fn test_score_is_capped_at_100() {
    let mut sessions = Vec::new();
    for day in 1..=10 {
        let mut s = completed_session(day, date(2024, 3, day as u32), &[WHS]);
        s.reflection = "y".repeat(200);
        sessions.push(s);
    }
    let captures = vec![capture(10, CaptureType::Observation, &[])];

    let stats = score_competency_on(WHS, &sessions, &captures, Some(&rated(5)), date(2024, 3, 10));

    assert_eq!(stats.consistency, 25);
    assert_eq!(stats.score, 100);
    assert_eq!(stats.status, CompetencyStatus::Strong);
}

#[test]
fn test_same_day_sessions_count_once_for_consistency() {
    let sessions = vec![
        completed_session(1, date(2024, 3, 1), &[WHS]),
        completed_session(2, date(2024, 3, 1), &[WHS]),
    ];
    let stats = score_competency_on(WHS, &sessions, &[], None, date(2024, 3, 1));
    assert_eq!(stats.consistency, 5);
    assert_eq!(stats.evidence.len(), 2);
}

#[test]
fn test_capture_tags_make_a_session_relevant() {
    let sessions = vec![
        completed_session(1, date(2024, 3, 1), &[]),
        completed_session(2, date(2024, 3, 5), &[]),
    ];
    let captures = vec![capture(1, CaptureType::Text, &["whs"])];

    let relevant = relevant_sessions(WHS, &sessions, &captures);
    assert_eq!(relevant.len(), 1);
    assert_eq!(relevant[0].id, Some(1));
}

#[test]
fn test_relevant_sessions_are_newest_first() {
    let sessions = vec![
        completed_session(1, date(2024, 1, 1), &[WHS]),
        completed_session(2, date(2024, 2, 1), &[WHS]),
    ];
    let ids: Vec<_> = relevant_sessions(WHS, &sessions, &[])
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![Some(2), Some(1)]);
}

#[test]
fn test_tag_matching_rules() {
    assert!(tag_matches("WHS", WHS));
    assert!(tag_matches(WHS, "whs"));
    assert!(tag_matches("behavior", "Observe and record behaviour/health"));
    assert!(!tag_matches("", WHS));
    assert!(!tag_matches("   ", WHS));
    assert!(!tag_matches("enrichment", WHS));
    assert!(tag_matches("husbandry", "Routine animal care and husbandry"));
    assert!(tag_matches("Routine animal care and husbandry", "husbandry"));
}

#[test]
fn test_recency_bands() {
    assert_eq!(recency_points(0), 20);
    assert_eq!(recency_points(14), 20);
    assert_eq!(recency_points(15), 15);
    assert_eq!(recency_points(30), 15);
    assert_eq!(recency_points(60), 10);
    assert_eq!(recency_points(90), 5);
    assert_eq!(recency_points(91), 0);
}

#[test]
fn test_status_thresholds() {
    assert_eq!(CompetencyStatus::from_score(0), CompetencyStatus::NotStarted);
    assert_eq!(CompetencyStatus::from_score(1), CompetencyStatus::InProgress);
    assert_eq!(CompetencyStatus::from_score(49), CompetencyStatus::InProgress);
    assert_eq!(CompetencyStatus::from_score(50), CompetencyStatus::Consistent);
    assert_eq!(CompetencyStatus::from_score(79), CompetencyStatus::Consistent);
    assert_eq!(CompetencyStatus::from_score(80), CompetencyStatus::Strong);
}

#[test]
fn test_session_today_never_lowers_recency() {
    let today = date(2024, 6, 1);
    let mut sessions = vec![
        completed_session(1, date(2024, 1, 10), &[WHS]),
        completed_session(2, date(2024, 4, 20), &[WHS]),
    ];
    let before = score_competency_on(WHS, &sessions, &[], None, today);

    sessions.push(completed_session(3, today, &[WHS]));
    let after = score_competency_on(WHS, &sessions, &[], None, today);

    assert!(after.recency >= before.recency);
    assert_eq!(after.recency, 20);
    assert!(after.score >= before.score);
}
