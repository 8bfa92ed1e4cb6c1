//! Text rendering of reports.
//!
//! Durations render in one of two modes:
//!
//! - [`TotalFormat::Compact`]: decimal hours with one fractional digit
//!   (`+12.4h`). Tenths are rounded half away from zero on whole seconds, so
//!   180 seconds (0.05h) render as `0.1h` and 179 seconds as `0.0h`.
//! - [`TotalFormat::Exact`]: whole workdays plus `HH:MM:SS`
//!   (`+1 Workday and 04:20:23`), or only the clock part when the duration is
//!   shorter than a workday.
//!
//! Signed values carry the sign of the unrounded duration; zero is `+`.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::DayKind;
use crate::ledger::{DayRecord, Report};

/// Records kept at each end of a truncated day list.
const TRUNCATE_KEEP: usize = 5;
const ELLIPSIS: &str = "⋮";
const SEPARATOR: &str = "------";

const SECONDS_PER_TENTH_HOUR: u64 = 360;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {setting}: {value} (expected one of {expected})")]
pub struct UnknownDisplayMode {
    setting: &'static str,
    value: String,
    expected: &'static str,
}

/// How durations (and the total) are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalFormat {
    Compact,
    Exact,
}

impl fmt::Display for TotalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compact => "compact",
            Self::Exact => "exact",
        })
    }
}

impl FromStr for TotalFormat {
    type Err = UnknownDisplayMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "exact" => Ok(Self::Exact),
            _ => Err(UnknownDisplayMode {
                setting: "total format",
                value: s.to_string(),
                expected: "compact, exact",
            }),
        }
    }
}

/// Which days of a report are listed above the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayList {
    Full,
    /// The first and last five days when there are more than ten.
    Truncate,
    None,
}

impl fmt::Display for DayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::Truncate => "truncate",
            Self::None => "none",
        })
    }
}

impl FromStr for DayList {
    type Err = UnknownDisplayMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "truncate" => Ok(Self::Truncate),
            "none" => Ok(Self::None),
            _ => Err(UnknownDisplayMode {
                setting: "day list",
                value: s.to_string(),
                expected: "full, truncate, none",
            }),
        }
    }
}

/// Renders an unsigned duration.
pub fn format_duration(duration: Duration, mode: TotalFormat, hours_per_day: Duration) -> String {
    let seconds = duration.num_seconds().unsigned_abs();
    match mode {
        TotalFormat::Compact => compact(seconds),
        TotalFormat::Exact => exact(seconds, hours_per_day),
    }
}

/// Renders a signed duration such as an overtime delta.
pub fn format_delta(delta: Duration, mode: TotalFormat, hours_per_day: Duration) -> String {
    let sign = if delta < Duration::zero() { '-' } else { '+' };
    format!("{sign}{}", format_duration(delta, mode, hours_per_day))
}

fn compact(seconds: u64) -> String {
    let tenths = (seconds + SECONDS_PER_TENTH_HOUR / 2) / SECONDS_PER_TENTH_HOUR;
    format!("{}.{}h", tenths / 10, tenths % 10)
}

fn exact(seconds: u64, hours_per_day: Duration) -> String {
    let per_day = hours_per_day.num_seconds().unsigned_abs().max(1);
    let workdays = seconds / per_day;
    let rest = seconds % per_day;
    let clock = format!(
        "{:02}:{:02}:{:02}",
        rest / 3600,
        rest % 3600 / 60,
        rest % 60
    );
    if workdays > 0 {
        format!("{workdays} Workday and {clock}")
    } else {
        clock
    }
}

fn day_line(day: &DayRecord, mode: TotalFormat, hours_per_day: Duration) -> String {
    let mut line = format!(
        "{} {} {:<8} expected {} actual {} {}",
        day.date.format("%a"),
        day.date.format("%Y-%m-%d"),
        day.kind,
        format_duration(day.expected, mode, hours_per_day),
        format_duration(day.actual, mode, hours_per_day),
        format_delta(day.delta, mode, hours_per_day),
    );
    if day.kind == DayKind::Ignored && day.tracked > Duration::zero() {
        line.push_str(&format!(
            " (tracked {}, not counted)",
            format_duration(day.tracked, mode, hours_per_day)
        ));
    }
    line
}

/// Renders a report as text: the selected day lines, then the total.
pub fn format_report(report: &Report, total_format: TotalFormat, day_list: DayList) -> String {
    let hours_per_day = report.hours_per_day;
    let render = |day: &DayRecord| day_line(day, total_format, hours_per_day);
    let mut lines: Vec<String> = Vec::new();

    match day_list {
        DayList::Full => lines.extend(report.days.iter().map(render)),
        DayList::Truncate if report.days.len() > 2 * TRUNCATE_KEEP => {
            let tail = report.days.len() - TRUNCATE_KEEP;
            lines.extend(report.days[..TRUNCATE_KEEP].iter().map(render));
            lines.push(ELLIPSIS.to_string());
            lines.extend(report.days[tail..].iter().map(render));
        }
        DayList::Truncate => lines.extend(report.days.iter().map(render)),
        DayList::None => {}
    }
    if day_list != DayList::None {
        lines.push(SEPARATOR.to_string());
    }

    lines.push(format!(
        "Total: {}",
        format_delta(report.total, total_format, hours_per_day)
    ));
    if !report.lookup_gaps.is_empty() {
        lines.push(format!(
            "Note: no holiday data for {} day(s), counted them as regular days",
            report.lookup_gaps.len()
        ));
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}
