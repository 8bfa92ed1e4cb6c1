//! Watson worktime CLI library.
//!
//! This crate provides the CLI interface for the worktime engine: it reads
//! Watson's frames and the vacation/ignored day files, and prints reports.

mod cli;
pub mod commands;
mod config;
pub mod store;
pub mod watson;

pub use cli::{Cli, Commands, DayArgs, ReportArgs, VacationAction};
pub use config::{CONFIG_FILE, Config, watson_dir};
