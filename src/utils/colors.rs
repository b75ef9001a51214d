/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

use crate::core::badges::BadgeTier;
use crate::core::scoring::CompetencyStatus;
use crate::models::SessionStatus;

pub fn color_for_status(status: CompetencyStatus) -> &'static str {
    match status {
        CompetencyStatus::NotStarted => GREY,
        CompetencyStatus::InProgress => YELLOW,
        CompetencyStatus::Consistent => BLUE,
        CompetencyStatus::Strong => GREEN,
    }
}

pub fn color_for_tier(tier: BadgeTier) -> &'static str {
    match tier {
        BadgeTier::None => GREY,
        BadgeTier::Bronze => YELLOW,
        BadgeTier::Silver => CYAN,
        BadgeTier::Gold => MAGENTA,
    }
}

pub fn color_for_session(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Active => GREEN,
        SessionStatus::Completed => RESET,
    }
}

/// Grey out empty values ("", "-", "0h 0m").
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "-" || v == "0h 0m" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

pub fn paint(color: &str, value: &str) -> String {
    format!("{color}{value}{RESET}")
}
