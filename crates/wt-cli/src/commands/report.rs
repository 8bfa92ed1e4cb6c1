//! Report command for showing overtime over a period.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use wt_core::{
    CalendarConfig, CalendarPolicy, DailyTotals, DayList, HolidayCalendar, Report, Selection,
    TotalFormat, bucket_by_day, build_report, format_report,
};

use crate::Config;
use crate::store::DayStore;
use crate::watson;

/// What to report on and how to show it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub selection: Selection,
    /// Count the running frame up to now.
    pub include_current: bool,
    pub total_format: Option<TotalFormat>,
    pub day_list: Option<DayList>,
    pub json: bool,
}

/// Holidays, day sets and tracked time per day, loaded for one invocation.
#[derive(Debug)]
pub struct LedgerInputs {
    pub holidays: HolidayCalendar,
    pub vacation: BTreeSet<NaiveDate>,
    pub ignored: BTreeSet<NaiveDate>,
    pub tracked: DailyTotals,
}

impl LedgerInputs {
    /// Loads everything from `watson_dir`, bucketing tracked time into the
    /// civil days of `now`'s time zone.
    ///
    /// The running frame is closed at `now` when `include_current` is set.
    pub fn load<Tz: TimeZone>(
        config: &Config,
        watson_dir: &Path,
        now: &DateTime<Tz>,
        include_current: bool,
    ) -> Result<Self> {
        let holidays = config.holidays().context("invalid holiday configuration")?;
        let vacation = DayStore::vacation(watson_dir).load()?;
        let ignored = DayStore::ignored(watson_dir).load()?;

        let intervals = watson::load_intervals(watson_dir, include_current)?;
        let running_until = include_current.then(|| now.with_timezone(&Utc));
        let tracked = bucket_by_day(&intervals, running_until, &now.timezone());

        Ok(Self {
            holidays,
            vacation,
            ignored,
            tracked,
        })
    }

    pub fn policy<'a>(&'a self, calendar: &'a CalendarConfig) -> CalendarPolicy<'a> {
        CalendarPolicy::new(calendar, &self.holidays, &self.vacation, &self.ignored)
    }
}

/// Builds the ledger for `selection` from the data in `watson_dir`.
pub fn load_report<Tz: TimeZone>(
    config: &Config,
    calendar: &CalendarConfig,
    watson_dir: &Path,
    selection: Selection,
    include_current: bool,
    now: &DateTime<Tz>,
) -> Result<Report> {
    let range = selection.resolve(now.date_naive(), &calendar.work_week, calendar.inception)?;
    tracing::debug!(from = %range.from(), to = %range.to(), "resolved report range");

    let inputs = LedgerInputs::load(config, watson_dir, now, include_current)?;
    Ok(build_report(range, &inputs.policy(calendar), &inputs.tracked)?)
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    config: &Config,
    watson_dir: &Path,
    options: &ReportOptions,
    now: &DateTime<Tz>,
) -> Result<()> {
    let calendar = config.calendar().context("invalid configuration")?;
    let report = load_report(
        config,
        &calendar,
        watson_dir,
        options.selection,
        options.include_current,
        now,
    )?;

    if options.json {
        serde_json::to_writer_pretty(&mut *writer, &report)
            .context("failed to serialize report")?;
        writeln!(writer)?;
        return Ok(());
    }

    let total_format = options.total_format.unwrap_or(calendar.total_format);
    let day_list = options.day_list.unwrap_or(calendar.day_list);
    write!(writer, "{}", format_report(&report, total_format, day_list))?;
    Ok(())
}
