//! Vacation commands: list, add and delete vacation days.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use wt_core::DateRange;
use wt_core::interval::tracked_on;

use crate::commands::report::LedgerInputs;
use crate::store::DayStore;
use crate::{Config, DayArgs};

pub fn list<W: Write>(
    writer: &mut W,
    config: &Config,
    watson_dir: &Path,
    today: NaiveDate,
) -> Result<()> {
    let days = DayStore::vacation(watson_dir).load()?;
    for day in &days {
        writeln!(writer, "{}", day.format("%Y-%m-%d"))?;
    }

    let taken = days.iter().filter(|day| day.year() == today.year()).count();
    let remaining = i64::from(config.vacation_per_year) - i64::try_from(taken)?;
    writeln!(writer, "------")?;
    writeln!(writer, "Vacation days taken: {taken}")?;
    writeln!(writer, "Vacation days remaining: {remaining}")?;
    Ok(())
}

/// Adds the given days, plus every day of `--from`/`--to` that is a workday
/// or has tracked time. Weekends and holidays in a range are skipped.
///
/// The range is taken as given, even where it lies before the inception date.
pub fn add<W: Write, Tz: TimeZone>(
    writer: &mut W,
    config: &Config,
    watson_dir: &Path,
    args: &DayArgs,
    now: &DateTime<Tz>,
) -> Result<()> {
    let mut days = args.days.clone();

    if let Some((from, to)) = args.range() {
        let range = DateRange::new(from, to)?;
        let calendar = config.calendar().context("invalid configuration")?;
        let inputs = LedgerInputs::load(config, watson_dir, now, false)?;
        let policy = inputs.policy(&calendar);
        days.extend(range.days().filter(|&day| {
            policy.classify(day).expected > Duration::zero()
                || tracked_on(&inputs.tracked, day) > Duration::zero()
        }));
    }

    if days.is_empty() {
        anyhow::bail!("no days given");
    }

    let added = DayStore::vacation(watson_dir).add(&days)?;
    writeln!(writer, "Added {added} vacation day(s)")?;
    Ok(())
}

/// Removes the given days and every day of `--from`/`--to`.
pub fn del<W: Write>(writer: &mut W, watson_dir: &Path, args: &DayArgs) -> Result<()> {
    let mut days = args.days.clone();
    if let Some((from, to)) = args.range() {
        days.extend(DateRange::new(from, to)?.days());
    }

    if days.is_empty() {
        anyhow::bail!("no days given");
    }

    let removed = DayStore::vacation(watson_dir).remove(&days)?;
    writeln!(writer, "Removed {removed} vacation day(s)")?;
    Ok(())
}
