use crate::export::ExportFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for keeperlog
/// Field journal for placement sessions, captures and competency evidence
#[derive(Parser)]
#[command(
    name = "keeperlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A local-first field journal: log placement sessions, captures and competency evidence using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Start, complete and browse placement sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Record notes, observations, photos and voice memos
    Capture {
        #[command(subcommand)]
        action: CaptureAction,
    },

    /// Manage the competency list
    Competency {
        #[command(subcommand)]
        action: CompetencyAction,
    },

    /// Show evidence scores for every active competency
    Skills {
        #[arg(long, value_enum, default_value_t = FilterArg::All, help = "Filter by score band")]
        filter: FilterArg,

        #[arg(long, help = "Search competency code or category")]
        search: Option<String>,

        #[arg(long, help = "Show the score breakdown per component")]
        details: bool,
    },

    /// Show badge tiers earned from competency evidence
    Badges,

    /// Weekly and all-time session totals
    Stats,

    /// View or edit the user profile
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        qualification: Option<String>,

        #[arg(long = "facility", help = "Default facility for new sessions")]
        facility: Option<String>,

        #[arg(long = "target-hours", help = "Placement hours required")]
        target_hours: Option<i64>,

        #[arg(long = "reflection-length", value_parser = ["short", "standard"])]
        reflection_length: Option<String>,
    },

    /// Write a full backup bundle (JSON, optionally zipped)
    Backup {
        #[arg(long = "file", help = "Destination file")]
        file: String,

        #[arg(long = "compress", help = "Write a .zip archive")]
        compress: bool,

        #[arg(long = "force", help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Replace all journal data with a backup bundle
    Restore {
        #[arg(long = "file", help = "Backup file (.json or .zip)")]
        file: String,

        #[arg(long = "force", help = "Do not ask for confirmation")]
        force: bool,
    },

    /// Export sessions or the progress report
    Export {
        #[arg(long, value_enum, default_value_t = ExportWhat::Sessions)]
        what: ExportWhat,

        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        #[arg(long = "file", help = "Output file")]
        file: String,

        #[arg(
            long = "range",
            help = "Sessions period: YYYY, YYYY-MM, YYYY-MM-DD or A:B (default: all)"
        )]
        range: Option<String>,

        #[arg(long = "force", help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Import sessions from a CSV export
    Import {
        #[arg(long = "file", help = "CSV file in the export format")]
        file: String,
    },

    /// Delete all sessions, captures, competencies and legacy logs
    Clear {
        #[arg(long = "force", help = "Do not ask for confirmation")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a new session (only one may be active)
    Start {
        #[arg(long, help = "Facility (defaults to the profile's default facility)")]
        facility: Option<String>,

        #[arg(long, help = "Session date YYYY-MM-DD (default: today)")]
        date: Option<String>,

        #[arg(long = "at", help = "Start time HH:MM (default: now)")]
        at: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        area: Option<String>,

        #[arg(long)]
        supervisor: Option<String>,
    },

    /// Complete a session and record the reflection
    Complete {
        /// Session id (default: the active session)
        id: Option<i64>,

        #[arg(long = "end", help = "End time HH:MM on the session date (default: now)")]
        end: Option<String>,

        #[arg(long = "duration", help = "Duration in minutes (default: end - start)")]
        duration: Option<i64>,

        #[arg(long = "q1", help = "What did you observe or assist with today?")]
        q1: Option<String>,

        #[arg(long = "q2", help = "Why was it done that way? (Rationale)")]
        q2: Option<String>,

        #[arg(long = "q3", help = "What did you learn or understand better?")]
        q3: Option<String>,

        #[arg(long = "q4", help = "What would you do differently or watch for next time?")]
        q4: Option<String>,

        #[arg(long = "reflection", help = "Free-text reflection (overrides the prompts)")]
        reflection: Option<String>,

        #[arg(long = "competency", help = "Competency practised (repeatable)")]
        competencies: Vec<String>,

        #[arg(long)]
        supervisor: Option<String>,

        #[arg(long = "note", help = "Supervisor note")]
        note: Option<String>,
    },

    /// List sessions, newest first
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        #[arg(long, help = "YYYY, YYYY-MM, YYYY-MM-DD or A:B")]
        period: Option<String>,
    },

    /// Show one session with its reflection and captures
    Show { id: i64 },

    /// Delete a session and its captures
    Delete {
        id: i64,

        #[arg(long = "force", help = "Do not ask for confirmation")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum CaptureAction {
    /// Add a capture to a session
    Add {
        /// Text content
        content: Option<String>,

        #[arg(long, help = "Session id (default: the active session)")]
        session: Option<i64>,

        #[arg(long = "type", value_enum, default_value_t = CaptureTypeArg::Text)]
        kind: CaptureTypeArg,

        #[arg(long = "tag", help = "Tag, usually a competency keyword (repeatable)")]
        tags: Vec<String>,

        #[arg(long = "media", help = "Media reference (data URL or file path)")]
        media: Option<String>,

        #[arg(long = "share", help = "Allow this capture in exported reports")]
        share: bool,

        #[arg(long = "private", conflicts_with = "share", help = "Keep out of exported reports")]
        private: bool,
    },

    /// List captures of a session
    List {
        #[arg(long, help = "Session id (default: the active session)")]
        session: Option<i64>,
    },

    /// Delete a capture
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum CompetencyAction {
    /// List competencies
    List {
        #[arg(long, help = "Include hidden competencies")]
        all: bool,
    },

    /// Add a user-defined competency
    Add {
        code: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "Custom")]
        category: String,
    },

    /// Set the 0-5 self-rating of a competency (id or code)
    Rate { target: String, level: i64 },

    /// Hide a competency (id or code)
    Hide { target: String },

    /// Show a hidden competency again (id or code)
    Show { target: String },

    /// Replace every competency with the default list
    Reset {
        #[arg(long = "force", help = "Do not ask for confirmation")]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportWhat {
    Sessions,
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Active,
    Completed,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FilterArg {
    All,
    Gaps,
    Improving,
    Strong,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CaptureTypeArg {
    Text,
    Observation,
    Photo,
    Voice,
}
