use crate::cli::commands::{load_profile, open_store, session_or_active};
use crate::cli::parser::{Commands, SessionAction, StatusArg};
use crate::config::Config;
use crate::core::backup::confirm;
use crate::db::Completion;
use crate::errors::{AppError, AppResult};
use crate::export::csv::REFLECTION_PROMPTS;
use crate::models::{Capture, Session, SessionStatus};
use crate::ui::messages::{header, hint, info, success, warning};
use crate::utils::colors::{GREY, color_for_session, colorize_optional, paint};
use crate::utils::date::{local_datetime, parse_date, period_bounds, today};
use crate::utils::formatting::{bold, first_line, mins2readable, or_dash};
use crate::utils::table::{Column, Table};
use chrono::{Local, Utc};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Session { action } = cmd else {
        return Ok(());
    };

    match action {
        SessionAction::Start {
            facility,
            date,
            at,
            role,
            area,
            supervisor,
        } => start(cfg, facility, date, at, role, area, supervisor),
        SessionAction::Complete { id, .. } => complete(cfg, *id, action),
        SessionAction::List { status, period } => list(cfg, status, period),
        SessionAction::Show { id } => show(cfg, *id),
        SessionAction::Delete { id, force } => delete(cfg, *id, *force),
    }
}

fn start(
    cfg: &Config,
    facility: &Option<String>,
    date: &Option<String>,
    at: &Option<String>,
    role: &Option<String>,
    area: &Option<String>,
    supervisor: &Option<String>,
) -> AppResult<()> {
    let profile = load_profile(cfg)?;
    let facility = facility
        .clone()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(profile.default_facility);
    if facility.trim().is_empty() {
        return Err(AppError::InvalidFormat(
            "facility is required (pass --facility or set a default with `keeperlog profile --facility`)"
                .into(),
        ));
    }

    let day = match date {
        Some(d) => parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
        None => today(),
    };
    let start_time = match at {
        Some(t) => local_datetime(day, t).ok_or_else(|| AppError::InvalidDate(t.clone()))?,
        None if date.is_none() => Utc::now(),
        None => local_datetime(day, "09:00").unwrap_or_else(Utc::now),
    };

    let mut session = Session::start(day, start_time, facility.trim());
    session.role = role.clone();
    session.area = area.clone();
    session.supervisor = supervisor.clone();

    let mut store = open_store(cfg)?;
    let id = store.start_session(&session)?;
    store.audit(
        "add",
        &format!("session #{}", id),
        &format!("Session started at {}", session.facility),
    );

    success(format!(
        "Session #{} started at {} on {}",
        id,
        session.facility,
        session.date_str()
    ));
    hint("Add captures with `keeperlog capture add \"...\"`, then `keeperlog session complete`.");
    Ok(())
}

fn complete(cfg: &Config, id: Option<i64>, action: &SessionAction) -> AppResult<()> {
    let SessionAction::Complete {
        end,
        duration,
        q1,
        q2,
        q3,
        q4,
        reflection,
        competencies,
        supervisor,
        note,
        ..
    } = action
    else {
        return Ok(());
    };

    let mut store = open_store(cfg)?;
    let session = session_or_active(&store, id)?;
    let session_id = session.id.unwrap_or_default();

    let profile = load_profile(cfg)?;
    let short = match profile.reflection_length.as_deref() {
        Some(mode) => mode.eq_ignore_ascii_case("short"),
        None => cfg.short_reflection(),
    };

    // Short mode keeps the first and third prompt only
    let answers = [q1, q2, q3, q4];
    let mut prompts = Vec::new();
    for (i, answer) in answers.iter().enumerate() {
        let Some(text) = answer else { continue };
        if short && (i == 1 || i == 3) {
            warning(format!("Short reflection mode: Q{} ignored.", i + 1));
            continue;
        }
        prompts.push((REFLECTION_PROMPTS[i].to_string(), text.clone()));
    }

    let end_time = match end {
        Some(t) => Some(local_datetime(session.date, t).ok_or_else(|| AppError::InvalidDate(t.clone()))?),
        None => None,
    };

    let done = store.complete_session(
        session_id,
        Completion {
            end_time,
            duration_minutes: *duration,
            reflection: reflection.clone(),
            reflection_prompts: prompts,
            competencies: competencies.clone(),
            supervisor: supervisor.clone(),
            supervisor_note: note.clone(),
        },
    )?;

    store.audit(
        "complete",
        &format!("session #{}", session_id),
        &format!("Session completed ({} min)", done.duration_minutes),
    );

    success(format!(
        "Session #{} logged: {} at {}",
        session_id,
        mins2readable(done.duration_minutes),
        done.facility
    ));
    if done.competencies.is_empty() {
        hint("Tag competencies with --competency to build evidence.");
    }
    Ok(())
}

fn list(cfg: &Config, status: &Option<StatusArg>, period: &Option<String>) -> AppResult<()> {
    let store = open_store(cfg)?;

    let mut sessions = match period {
        Some(p) => {
            let (from, to) = period_bounds(p).map_err(AppError::InvalidDate)?;
            store.sessions_between(from, to)?
        }
        None => store.sessions_newest_first()?,
    };
    if let Some(st) = status {
        let wanted = match st {
            StatusArg::Active => SessionStatus::Active,
            StatusArg::Completed => SessionStatus::Completed,
        };
        sessions.retain(|s| s.status == wanted);
    }

    if sessions.is_empty() {
        info("No sessions found.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("Date", 10),
        Column::new("Facility", 28),
        Column::new("Role", 18),
        Column::new("Duration", 9),
        Column::new("Status", 9),
        Column::new("Competencies", 40),
    ]);

    let mut total = 0;
    for s in &sessions {
        total += s.duration_minutes;
        table.add_row(vec![
            s.id.unwrap_or_default().to_string(),
            s.date_str(),
            s.facility.clone(),
            colorize_optional(&or_dash(s.role.as_deref())),
            mins2readable(s.duration_minutes),
            paint(color_for_session(s.status), s.status.to_db_str()),
            colorize_optional(&if s.competencies.is_empty() {
                "-".to_string()
            } else {
                s.competencies.join("; ")
            }),
        ]);
    }

    print!("{}", table.render());
    println!(
        "\n{} session(s), {} total",
        sessions.len(),
        bold(&mins2readable(total))
    );
    Ok(())
}

fn capture_line(c: &Capture) -> String {
    let time = c
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();
    let body = if c.exportable() {
        c.content
            .as_deref()
            .map(first_line)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| c.media_url.as_ref().map(|_| "[media]".to_string()))
            .unwrap_or_else(|| "-".to_string())
    } else {
        paint(GREY, "[private photo withheld]")
    };
    let tags = if c.tags.is_empty() {
        String::new()
    } else {
        format!("  #{}", c.tags.join(" #"))
    };
    format!(
        "  #{:<4} {} {:<11} {}{}",
        c.id.unwrap_or_default(),
        time,
        c.kind.to_db_str(),
        body,
        tags
    )
}

fn show(cfg: &Config, id: i64) -> AppResult<()> {
    let store = open_store(cfg)?;
    let s: Session = store.get(id)?;
    let captures = store.captures_for_session(id)?;

    header(format!("Session #{} - {}", id, s.date_str()));
    println!("Facility   : {}", s.facility);
    println!("Status     : {}", paint(color_for_session(s.status), s.status.to_db_str()));
    println!(
        "Time       : {} → {}",
        s.start_time.with_timezone(&Local).format("%H:%M"),
        s.end_time
            .map(|e| e.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    );
    println!("Duration   : {}", mins2readable(s.duration_minutes));
    println!("Role       : {}", or_dash(s.role.as_deref()));
    println!("Area       : {}", or_dash(s.area.as_deref()));
    println!("Supervisor : {}", or_dash(s.supervisor.as_deref()));
    if let Some(note) = s.supervisor_note.as_deref().filter(|n| !n.trim().is_empty()) {
        println!("Sup. note  : {}", note);
    }
    if !s.competencies.is_empty() {
        println!("Competency : {}", s.competencies.join("; "));
    }

    if !s.reflection.trim().is_empty() {
        println!("\n{}", bold("Reflection"));
        println!("{}", s.reflection);
    }

    println!("\n{} ({})", bold("Captures"), captures.len());
    for c in &captures {
        println!("{}", capture_line(c));
    }
    Ok(())
}

fn delete(cfg: &Config, id: i64, force: bool) -> AppResult<()> {
    let mut store = open_store(cfg)?;
    let s: Session = store.get(id)?;
    let captures = store.captures_for_session(id)?.len();

    if !force
        && !confirm(&format!(
            "Delete session #{} ({} at {}) and its {} capture(s)?",
            id,
            s.date_str(),
            s.facility,
            captures
        ))?
    {
        info("Deletion cancelled.");
        return Ok(());
    }

    store.delete::<Session>(id)?;
    store.audit(
        "delete",
        &format!("session #{}", id),
        &format!("Session deleted with {} capture(s)", captures),
    );
    success(format!("Session #{} deleted ({} capture(s) removed).", id, captures));
    Ok(())
}
