//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use clap::{Args, Parser, Subcommand};
use wt_core::{DayList, Selection, TotalFormat};

use crate::commands::report::ReportOptions;
use crate::commands::util::parse_period;

/// Overtime and undertime reports for Watson.
///
/// Compares the time tracked with Watson against the expected working hours,
/// taking weekends, public holidays, vacation and ignored days into account.
#[derive(Debug, Parser)]
#[command(name = "wt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show overtime for a period.
    Report(ReportArgs),

    /// Manage vacation days.
    Vacation {
        #[command(subcommand)]
        action: VacationAction,
    },

    /// Stop counting the given days: nothing is expected, nothing credited.
    Ignore {
        #[arg(required = true)]
        days: Vec<NaiveDate>,
    },

    /// Count previously ignored days again.
    Unignore {
        #[arg(required = true)]
        days: Vec<NaiveDate>,
    },
}

/// Vacation subcommands.
#[derive(Debug, Subcommand)]
pub enum VacationAction {
    /// List vacation days and how many are left this year.
    List,

    /// Add vacation days.
    Add(DayArgs),

    /// Delete vacation days.
    Del(DayArgs),
}

/// Days given one by one and/or as an inclusive range.
#[derive(Debug, Clone, Args)]
pub struct DayArgs {
    /// Days in YYYY-MM-DD format.
    pub days: Vec<NaiveDate>,

    /// First day of the range.
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of the range.
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

impl DayArgs {
    pub const fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// First day to report on.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to report on (default: today).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Length of the period, e.g. "10d" or "2 weeks".
    #[arg(short, long, value_parser = parse_period)]
    pub period: Option<Days>,

    /// Report the current work week.
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    pub workweek: bool,

    /// Include the running frame.
    #[arg(short = 'C', long)]
    pub current: bool,

    /// How to render durations: compact or exact.
    #[arg(long)]
    pub total_format: Option<TotalFormat>,

    /// Which days to list: full, truncate or none.
    #[arg(long)]
    pub day_list: Option<DayList>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub const fn options(&self) -> ReportOptions {
        ReportOptions {
            selection: Selection {
                from: self.from,
                to: self.to,
                period: self.period,
                workweek: self.workweek,
            },
            include_current: self.current,
            total_format: self.total_format,
            day_list: self.day_list,
            json: self.json,
        }
    }
}
