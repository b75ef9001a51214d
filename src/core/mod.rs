//! Domain logic: pure scoring and derivations plus the command-level
//! workflows (backup, config, log) built on the store.

pub mod backup;
pub mod badges;
pub mod config;
pub mod log;
pub mod progress;
pub mod scoring;
pub mod stats;
