//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Minutes as `Xh Ym` (e.g. `125` → `2h 5m`).
pub fn mins2readable(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let abs_m = mins.abs();
    format!("{}{}h {}m", sign, abs_m / 60, abs_m % 60)
}

/// Fixed-width bar for a 0–100 score, e.g. `███████░░░`.
pub fn score_bar(score: i64, width: usize) -> String {
    let filled = ((score.clamp(0, 100) as usize) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// First line of a multi-line text, for one-row previews.
pub fn first_line(s: &str) -> &str {
    s.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim()
}

pub fn or_dash(s: Option<&str>) -> String {
    match s {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}
