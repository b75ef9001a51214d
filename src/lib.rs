//! keeperlog library root.
//! Exposes the CLI parser, the high-level run() function, the SQLite store and
//! the pure scoring/derivation helpers the commands are built on.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod profile;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let cmd = &cli.command;
    match cmd {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(cmd, cfg),
        Commands::Db { .. } => commands::db::handle(cmd, cfg),
        Commands::Log { .. } => commands::log::handle(cmd, cfg),
        Commands::Session { .. } => commands::session::handle(cmd, cfg),
        Commands::Capture { .. } => commands::capture::handle(cmd, cfg),
        Commands::Competency { .. } => commands::competency::handle(cmd, cfg),
        Commands::Skills { .. } | Commands::Badges => commands::skills::handle(cmd, cfg),
        Commands::Stats => commands::stats::handle(cfg),
        Commands::Profile { .. } => commands::profile::handle(cmd, cfg),
        Commands::Backup { .. } | Commands::Restore { .. } => commands::backup::handle(cmd, cfg),
        Commands::Export { .. } | Commands::Import { .. } => commands::export::handle(cmd, cfg),
        Commands::Clear { force } => commands::clear::handle(cfg, *force),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // `init` creates the config file, everything else reads it
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_database(custom_db)
            .to_string_lossy()
            .to_string();
    }

    dispatch(&cli, &cfg)
}
