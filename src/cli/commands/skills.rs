use crate::cli::commands::open_store;
use crate::cli::parser::{Commands, FilterArg};
use crate::config::Config;
use crate::core::badges::all_badges;
use crate::core::progress::{SkillFilter, skills_overview};
use crate::db::Store;
use crate::errors::AppResult;
use crate::models::{Capture, Session};
use crate::ui::messages::{header, hint, info};
use crate::utils::colors::{color_for_status, color_for_tier, paint};
use crate::utils::date::today;
use crate::utils::formatting::{bold, score_bar};
use crate::utils::table::{Column, Table};
use std::collections::HashMap;

impl From<FilterArg> for SkillFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => SkillFilter::All,
            FilterArg::Gaps => SkillFilter::Gaps,
            FilterArg::Improving => SkillFilter::Improving,
            FilterArg::Strong => SkillFilter::Strong,
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    match cmd {
        Commands::Skills {
            filter,
            search,
            details,
        } => skills(&store, (*filter).into(), search.as_deref(), *details),
        Commands::Badges => badges(&store),
        _ => Ok(()),
    }
}

fn skills(store: &Store, filter: SkillFilter, search: Option<&str>, details: bool) -> AppResult<()> {
    let overview = skills_overview(
        &store.competencies(true)?,
        &store.all::<Session>()?,
        &store.all::<Capture>()?,
        filter,
        search,
        today(),
    );

    header(format!(
        "Skills overview: {}/{} competencies with evidence ({}%)",
        overview.covered, overview.total, overview.coverage
    ));

    if overview.rows.is_empty() {
        info("No competencies match the current filter.");
        return Ok(());
    }

    let mut columns = vec![
        Column::new("Competency", 44),
        Column::new("Category", 12),
        Column::new("Score", 16),
        Column::new("Status", 12),
        Column::new("Sessions", 8),
    ];
    if details {
        columns.extend([
            Column::new("Cov", 3),
            Column::new("Depth", 5),
            Column::new("Cons", 4),
            Column::new("Rec", 3),
            Column::new("Conf", 4),
        ]);
    }
    let mut table = Table::new(columns);

    for row in &overview.rows {
        let st = &row.stats;
        let color = color_for_status(st.status);
        let mut cells = vec![
            row.competency.code.clone(),
            row.competency.category.clone(),
            format!("{} {:>3}", paint(color, &score_bar(st.score, 10)), st.score),
            paint(color, st.status.label()),
            st.evidence.len().to_string(),
        ];
        if details {
            cells.extend([
                st.coverage.to_string(),
                st.depth.to_string(),
                st.consistency.to_string(),
                st.recency.to_string(),
                st.confidence_points.to_string(),
            ]);
        }
        table.add_row(cells);
    }

    print!("{}", table.render());

    if overview.covered == 0 {
        hint("Tag completed sessions with --competency to start building evidence.");
    }
    Ok(())
}

fn badges(store: &Store) -> AppResult<()> {
    let overview = skills_overview(
        &store.competencies(false)?,
        &store.all::<Session>()?,
        &store.all::<Capture>()?,
        SkillFilter::All,
        None,
        today(),
    );
    let scores: HashMap<String, i64> = overview
        .rows
        .iter()
        .map(|r| (r.competency.code.to_lowercase(), r.stats.score))
        .collect();

    let progress = all_badges(|code| scores.get(&code.to_lowercase()).copied().unwrap_or(0));
    let earned = progress.iter().filter(|p| p.score > 0).count();

    header(format!("Badges: {}/{} earned", earned, progress.len()));

    let mut table = Table::new(vec![
        Column::new("", 2),
        Column::new("Badge", 24),
        Column::new("Tier", 8),
        Column::new("Score", 5),
        Column::new("Next", 16),
        Column::new("Description", 56),
    ]);
    for p in &progress {
        let next = match p.next_tier {
            Some(tier) => format!("{} at {}", tier.label(), p.next_target),
            None => "maxed".to_string(),
        };
        table.add_row(vec![
            p.badge.symbol.to_string(),
            p.badge.name.to_string(),
            paint(color_for_tier(p.tier), p.tier.label()),
            p.score.to_string(),
            next,
            p.badge.description.to_string(),
        ]);
    }
    print!("{}", table.render());

    if earned == 0 {
        println!("\n{}", bold("Complete a tagged session to earn your first badge."));
    }
    Ok(())
}
