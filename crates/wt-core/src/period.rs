//! Resolves the user's period selection into an inclusive date range.

use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;

use crate::ledger::{DateRange, ReportError};
use crate::schedule::WorkWeek;

/// Length of the report when neither a start, a period nor an inception is known.
pub const DEFAULT_PERIOD: Days = Days::new(7);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PeriodError {
    #[error("cannot combine --workweek with --from or --to")]
    WorkweekWithBounds,

    #[error("cannot give all of --from, --to and --period")]
    OverSpecified,

    #[error("period reaches outside the supported calendar")]
    OutOfCalendar,

    #[error(transparent)]
    Range(#[from] ReportError),
}

/// How the user selected the dates to report on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub period: Option<Days>,
    /// From the most recent first workday of the week through today.
    pub workweek: bool,
}

impl Selection {
    /// Resolves the selection relative to `today`.
    ///
    /// Without an explicit start the range begins `period` days before its
    /// end, else at `inception`, else [`DEFAULT_PERIOD`] days before its end.
    pub fn resolve(
        &self,
        today: NaiveDate,
        work_week: &WorkWeek,
        inception: Option<NaiveDate>,
    ) -> Result<DateRange, PeriodError> {
        if self.workweek {
            if self.from.is_some() || self.to.is_some() {
                return Err(PeriodError::WorkweekWithBounds);
            }
            let first = work_week.first();
            let back = (7 + today.weekday().num_days_from_monday()
                - first.num_days_from_monday())
                % 7;
            let start = today
                .checked_sub_days(Days::new(u64::from(back)))
                .ok_or(PeriodError::OutOfCalendar)?;
            return Ok(DateRange::new(start, today)?);
        }

        if self.from.is_some() && self.to.is_some() && self.period.is_some() {
            return Err(PeriodError::OverSpecified);
        }

        let end = self.to.unwrap_or(today);
        let start = match (self.from, self.period, inception) {
            (Some(from), _, _) => from,
            (None, Some(period), _) => end
                .checked_sub_days(period)
                .ok_or(PeriodError::OutOfCalendar)?,
            (None, None, Some(inception)) => inception,
            (None, None, None) => end
                .checked_sub_days(DEFAULT_PERIOD)
                .ok_or(PeriodError::OutOfCalendar)?,
        };
        Ok(DateRange::new(start, end)?)
    }
}
