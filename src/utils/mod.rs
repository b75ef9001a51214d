//! Small helpers shared by the CLI handlers and the exporters.

pub mod colors;
pub mod date;
pub mod formatting;
pub mod path;
pub mod table;
