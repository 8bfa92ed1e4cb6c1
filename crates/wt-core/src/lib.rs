//! Worktime accounting engine.
//!
//! This crate turns tracked time intervals into an overtime ledger:
//! - Calendar policy: which days are workdays, holidays, vacation or ignored
//! - Interval aggregation: tracked time per civil day
//! - Ledger: expected versus actual work per day and the signed total
//! - Formatting: compact or exact text rendering of the ledger
//!
//! Everything here is a pure function of its inputs. "Today" and "now" are
//! always passed in by the caller.

pub mod calendar;
pub mod config;
pub mod format;
pub mod holiday;
pub mod interval;
pub mod ledger;
pub mod period;
pub mod schedule;

pub use calendar::{CalendarPolicy, Classification, DateSet, DayKind};
pub use config::{CalendarConfig, ConfigError};
pub use format::{DayList, TotalFormat, format_delta, format_duration, format_report};
pub use holiday::{GermanHolidays, HolidayCalendar, HolidaySource, LookupGap, NoHolidays};
pub use interval::{DailyTotals, IntervalError, TimeInterval, bucket_by_day};
pub use ledger::{DateRange, DayRecord, Report, ReportError, build_report};
pub use period::{PeriodError, Selection};
pub use schedule::{UnknownWeekday, WorkWeek, parse_weekday};
