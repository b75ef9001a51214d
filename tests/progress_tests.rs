use keeperlog::core::badges::{BADGE_DEFINITIONS, BadgeTier, all_badges, badge_by_id};
use keeperlog::core::progress::{SkillFilter, skills_overview};
use keeperlog::core::stats::{
    ExportStamp, ReminderPolicy, export_due, session_stats, target_progress,
};
use keeperlog::db::seed::default_competencies;
use keeperlog::models::Competency;

mod common;
use common::{completed_session, date};

#[test]
fn test_badge_tiers_and_next_targets() {
    assert_eq!(BadgeTier::for_score(0), BadgeTier::None);
    assert_eq!(BadgeTier::for_score(1), BadgeTier::Bronze);
    assert_eq!(BadgeTier::for_score(50), BadgeTier::Silver);
    assert_eq!(BadgeTier::for_score(80), BadgeTier::Gold);

    assert_eq!(BadgeTier::None.next(), (Some(BadgeTier::Bronze), 1));
    assert_eq!(BadgeTier::Silver.next(), (Some(BadgeTier::Gold), 80));
    assert_eq!(BadgeTier::Gold.next(), (None, 100));
}

#[test]
fn test_every_badge_links_a_default_competency() {
    let defaults = default_competencies();
    assert_eq!(BADGE_DEFINITIONS.len(), 10);
    for badge in BADGE_DEFINITIONS {
        assert!(
            defaults.iter().any(|c| c.code == badge.competency_code),
            "badge {} has no default competency",
            badge.id
        );
    }
}

#[test]
fn test_all_badges_uses_linked_scores() {
    let progress = all_badges(|code| {
        if code == "Workplace health and safety (WHS)" {
            85
        } else {
            0
        }
    });
    let kangaroo = progress.iter().find(|p| p.badge.id == "kangaroo").unwrap();
    assert_eq!(kangaroo.tier, BadgeTier::Gold);
    assert_eq!(kangaroo.next_tier, None);

    let earned = progress.iter().filter(|p| p.tier != BadgeTier::None).count();
    assert_eq!(earned, 1);
    assert!(badge_by_id("KANGAROO").is_some());
    assert!(badge_by_id("unicorn").is_none());
}

fn catalogue() -> Vec<Competency> {
    let mut list = default_competencies();
    list[9].active = Some(false);
    list
}

#[test]
fn test_overview_coverage_ignores_hidden_and_filters() {
    let sessions = vec![
        completed_session(1, date(2024, 3, 1), &["Workplace health and safety (WHS)"]),
        completed_session(2, date(2024, 3, 2), &["Safe handling and restraint"]),
    ];
    let today = date(2024, 3, 3);

    let all = skills_overview(&catalogue(), &sessions, &[], SkillFilter::All, None, today);
    assert_eq!(all.total, 9);
    assert_eq!(all.covered, 2);
    assert_eq!(all.coverage, 22);
    assert_eq!(all.rows.len(), 9);

    let gaps = skills_overview(&catalogue(), &sessions, &[], SkillFilter::Gaps, None, today);
    assert_eq!(gaps.rows.len(), 7);
    assert_eq!(gaps.coverage, 22);

    let improving =
        skills_overview(&catalogue(), &sessions, &[], SkillFilter::Improving, None, today);
    assert_eq!(improving.rows.len(), 2);
}

#[test]
fn test_overview_search_and_order() {
    let found = skills_overview(
        &catalogue(),
        &[],
        &[],
        SkillFilter::All,
        Some("  HYGIENE "),
        date(2024, 3, 3),
    );
    assert_eq!(found.rows.len(), 1);
    assert_eq!(found.rows[0].competency.code, "Hygiene, cleaning, and biosecurity");

    let all = skills_overview(&catalogue(), &[], &[], SkillFilter::All, None, date(2024, 3, 3));
    let codes: Vec<String> = all.rows.iter().map(|r| r.competency.code.to_lowercase()).collect();
    let mut sorted = codes.clone();
    sorted.sort();
    assert_eq!(codes, sorted);
}

#[test]
fn test_filter_parsing() {
    assert_eq!("gaps".parse::<SkillFilter>().unwrap(), SkillFilter::Gaps);
    assert_eq!(" Strong ".parse::<SkillFilter>().unwrap(), SkillFilter::Strong);
    assert!("weak".parse::<SkillFilter>().is_err());
}

#[test]
fn test_week_and_total_stats() {
    // 2024-03-06 is a Wednesday; the week starts Monday 2024-03-04
    let sessions = vec![
        completed_session(1, date(2024, 3, 3), &[]),
        completed_session(2, date(2024, 3, 4), &[]),
        completed_session(3, date(2024, 3, 6), &[]),
    ];
    let stats = session_stats(&sessions, date(2024, 3, 6));

    assert_eq!(stats.week_start, date(2024, 3, 4));
    assert_eq!(stats.week.count, 2);
    assert_eq!(stats.week.minutes, 240);
    assert_eq!(stats.total.count, 3);
    assert_eq!(stats.total.minutes, 360);
}

#[test]
fn test_target_progress_is_capped() {
    assert_eq!(target_progress(600, 100), 10);
    assert_eq!(target_progress(12_000, 100), 100);
    assert_eq!(target_progress(600, 0), 0);
}

#[test]
fn test_export_reminder() {
    let policy = ReminderPolicy::default();
    let today = date(2024, 3, 20);

    assert!(!export_due(0, None, today, policy));
    assert!(export_due(1, None, today, policy));

    let recent = ExportStamp {
        date: date(2024, 3, 18),
        session_count: 4,
    };
    assert!(!export_due(9, Some(recent), today, policy));
    assert!(export_due(10, Some(recent), today, policy));

    let stale = ExportStamp {
        date: date(2024, 3, 1),
        session_count: 4,
    };
    assert!(export_due(4, Some(stale), today, policy));
}
