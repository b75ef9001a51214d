//! One-line status messages. Results go to stdout; warnings and errors go to
//! stderr so they never end up inside redirected exports.

use ansi_term::{Colour, Style};
use std::fmt::Display;

enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn icon(&self) -> &'static str {
        match self {
            Level::Info => "ℹ️",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Error => "❌",
        }
    }

    fn style(&self) -> Style {
        let colour = match self {
            Level::Info => Colour::Blue,
            Level::Success => Colour::Green,
            Level::Warning => Colour::Yellow,
            Level::Error => Colour::Red,
        };
        colour.bold()
    }

    fn line(&self, msg: &dyn Display) -> String {
        format!("{} {}", self.style().paint(self.icon()), msg)
    }
}

pub fn info<T: Display>(msg: T) {
    println!("{}", Level::Info.line(&msg));
}

pub fn success<T: Display>(msg: T) {
    println!("{}", Level::Success.line(&msg));
}

pub fn warning<T: Display>(msg: T) {
    eprintln!("{}", Level::Warning.line(&msg));
}

pub fn error<T: Display>(msg: T) {
    eprintln!("{}", Level::Error.line(&msg));
}

/// Dimmed suggestion printed after a result.
pub fn hint<T: Display>(msg: T) {
    println!("{}", Style::new().dimmed().paint(format!("💡 {}", msg)));
}

pub fn header<T: Display>(title: T) {
    let title = title.to_string();
    let rule = "─".repeat(title.chars().count().max(24));
    let style = Colour::Blue.bold();
    println!("{}\n{}", style.paint(title), style.paint(rule));
}
