//! Resolved calendar configuration consumed by the engine.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::format::{DayList, TotalFormat};
use crate::schedule::{UnknownWeekday, WorkWeek};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Errors raised while turning raw settings into a [`CalendarConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    UnknownWeekday(#[from] UnknownWeekday),

    #[error("at least one workday must be configured")]
    NoWorkdays,

    #[error("hours per day must be greater than 0 and at most 24, got {hours}")]
    InvalidHoursPerDay { hours: f64 },

    #[error("no holiday calendar for country {country:?}")]
    UnsupportedCountry { country: String },

    #[error("unknown region {region:?} for country {country:?}")]
    UnsupportedRegion { country: String, region: String },
}

/// Fully validated calendar settings.
///
/// Built once at startup; the engine never sees unparsed configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConfig {
    /// ISO country code used for the holiday calendar (e.g. `DE`).
    pub country: String,
    /// Region or state code within the country (e.g. `BW`).
    pub region: Option<String>,
    pub work_week: WorkWeek,
    /// Expected work per configured workday.
    pub hours_per_day: Duration,
    /// Earliest date ever considered; reports never start before it.
    pub inception: Option<NaiveDate>,
    /// Informational only, shown by `vacation list`.
    pub vacation_per_year: u32,
    pub total_format: TotalFormat,
    pub day_list: DayList,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            country: "DE".to_string(),
            region: Some("BW".to_string()),
            work_week: WorkWeek::monday_to_friday(),
            hours_per_day: Duration::hours(8),
            inception: None,
            vacation_per_year: 30,
            total_format: TotalFormat::Exact,
            day_list: DayList::Full,
        }
    }
}

/// Converts a configured number of hours into a whole-second duration.
#[allow(clippy::cast_possible_truncation)]
pub fn hours_per_day(hours: f64) -> Result<Duration, ConfigError> {
    if !hours.is_finite() || hours <= 0.0 || hours > 24.0 {
        return Err(ConfigError::InvalidHoursPerDay { hours });
    }
    Ok(Duration::seconds((hours * SECONDS_PER_HOUR).round() as i64))
}
