//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::Days;
use regex::Regex;

/// Pre-compiled regex for period lengths such as `3d`, `10 days` or `2w`.
static PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*(d|days?|w|weeks?)$").expect("period regex is valid")
});

/// Upper bound for periods (~1000 years in days).
const MAX_PERIOD_DAYS: u64 = 1000 * 366;

/// Parse a period length.
///
/// Supports:
/// - Days: "3d", "3 days", "1 day"
/// - Weeks: "2w", "2 weeks", "1 week"
pub fn parse_period(s: &str) -> anyhow::Result<Days> {
    let Some(caps) = PERIOD_RE.captures(s.trim()) else {
        anyhow::bail!("Invalid period: {s}. Use days or weeks (e.g., '10d', '2 weeks')");
    };

    let n: u64 = caps[1].parse().context("failed to parse number in period")?;
    let days = if caps[2].starts_with('w') {
        n.checked_mul(7)
    } else {
        Some(n)
    };

    match days {
        Some(days) if days <= MAX_PERIOD_DAYS => Ok(Days::new(days)),
        _ => anyhow::bail!("Period too long: {s}"),
    }
}
