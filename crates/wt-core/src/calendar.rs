//! Calendar policy: classifies days and derives the expected work per day.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::config::CalendarConfig;
use crate::holiday::HolidaySource;

/// Membership test over a set of civil dates.
///
/// Vacation and ignored days are consumed through this trait so the backing
/// store can change without touching the engine.
pub trait DateSet {
    fn contains_date(&self, date: NaiveDate) -> bool;
}

impl DateSet for BTreeSet<NaiveDate> {
    fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(&date)
    }
}

impl<S: std::hash::BuildHasher> DateSet for HashSet<NaiveDate, S> {
    fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(&date)
    }
}

/// Why a day has the expectation it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    Workday,
    Weekend,
    Holiday,
    Vacation,
    Ignored,
}

impl DayKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workday => "workday",
            Self::Weekend => "weekend",
            Self::Holiday => "holiday",
            Self::Vacation => "vacation",
            Self::Ignored => "ignored",
        }
    }

    /// Whether tracked time on this kind of day counts toward the total.
    pub const fn credits_tracked_time(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result of classifying one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: DayKind,
    /// Work expected on this day; zero for everything but workdays.
    pub expected: Duration,
    /// The holiday source could not answer and the date was assumed not to be a holiday.
    pub lookup_gap: bool,
}

/// Everything needed to classify a date.
pub struct CalendarPolicy<'a> {
    config: &'a CalendarConfig,
    holidays: &'a dyn HolidaySource,
    vacation: &'a dyn DateSet,
    ignored: &'a dyn DateSet,
}

impl<'a> CalendarPolicy<'a> {
    pub fn new(
        config: &'a CalendarConfig,
        holidays: &'a dyn HolidaySource,
        vacation: &'a dyn DateSet,
        ignored: &'a dyn DateSet,
    ) -> Self {
        Self {
            config,
            holidays,
            vacation,
            ignored,
        }
    }

    pub const fn config(&self) -> &CalendarConfig {
        self.config
    }

    /// Classifies a date.
    ///
    /// Precedence: ignored, vacation, holiday, configured workday, weekend.
    /// The holiday source is only consulted when the outcome depends on it.
    pub fn classify(&self, date: NaiveDate) -> Classification {
        let mut lookup_gap = false;

        let kind = if self.ignored.contains_date(date) {
            DayKind::Ignored
        } else if self.vacation.contains_date(date) {
            DayKind::Vacation
        } else if self.holidays.is_holiday(date).unwrap_or_else(|gap| {
            tracing::debug!(%gap, "holiday lookup failed, assuming regular day");
            lookup_gap = true;
            false
        }) {
            DayKind::Holiday
        } else if self.config.work_week.contains(date.weekday()) {
            DayKind::Workday
        } else {
            DayKind::Weekend
        };

        let expected = if kind == DayKind::Workday {
            self.config.hours_per_day
        } else {
            Duration::zero()
        };

        Classification {
            kind,
            expected,
            lookup_gap,
        }
    }
}
