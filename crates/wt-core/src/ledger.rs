//! Per-day ledger of expected versus actual work.
//!
//! [`build_report`] walks an inclusive date range, classifies each day with
//! the [`CalendarPolicy`], looks up tracked time and emits one [`DayRecord`]
//! per day. It performs no I/O and never reads the clock.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::calendar::{CalendarPolicy, DayKind};
use crate::interval::{DailyTotals, tracked_on};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// The range is empty, either as given or after clamping to inception.
    #[error("empty date range: {from} is after {to}")]
    Range { from: NaiveDate, to: NaiveDate },
}

/// An inclusive, non-empty range of civil dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ReportError> {
        if from > to {
            return Err(ReportError::Range { from, to });
        }
        Ok(Self { from, to })
    }

    /// A range covering a single day.
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    /// Moves the start forward to `earliest` if the range begins before it.
    pub fn clamp_start(self, earliest: NaiveDate) -> Result<Self, ReportError> {
        Self::new(self.from.max(earliest), self.to)
    }

    /// Every date in the range, ascending.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |day| *day <= to)
    }
}

/// One day of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub kind: DayKind,
    #[serde(serialize_with = "seconds")]
    pub expected: Duration,
    /// Everything tracked on this day, credited or not.
    #[serde(serialize_with = "seconds")]
    pub tracked: Duration,
    /// Tracked time that counts toward the total (zero on ignored days).
    #[serde(serialize_with = "seconds")]
    pub actual: Duration,
    /// `actual - expected`.
    #[serde(serialize_with = "seconds")]
    pub delta: Duration,
}

/// The ledger for a date range and its signed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub range: DateRange,
    pub days: Vec<DayRecord>,
    #[serde(serialize_with = "seconds")]
    pub total: Duration,
    #[serde(serialize_with = "seconds")]
    pub hours_per_day: Duration,
    /// Days the holiday source could not answer for; treated as non-holidays.
    pub lookup_gaps: Vec<NaiveDate>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn seconds<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

/// Builds the ledger for `range`.
///
/// A range starting before the configured inception is clamped to it; if
/// nothing is left the build fails with [`ReportError::Range`].
pub fn build_report(
    range: DateRange,
    policy: &CalendarPolicy<'_>,
    actual_by_day: &DailyTotals,
) -> Result<Report, ReportError> {
    let config = policy.config();
    let range = match config.inception {
        Some(inception) => range.clamp_start(inception)?,
        None => range,
    };

    let mut days = Vec::new();
    let mut lookup_gaps = Vec::new();
    let mut total = Duration::zero();

    for date in range.days() {
        let class = policy.classify(date);
        if class.lookup_gap {
            lookup_gaps.push(date);
        }

        let tracked = tracked_on(actual_by_day, date);
        let actual = if class.kind.credits_tracked_time() {
            tracked
        } else {
            Duration::zero()
        };
        let delta = actual - class.expected;
        total += delta;

        days.push(DayRecord {
            date,
            kind: class.kind,
            expected: class.expected,
            tracked,
            actual,
            delta,
        });
    }

    if let Some(first) = lookup_gaps.first() {
        tracing::warn!(
            days = lookup_gaps.len(),
            first = %first,
            "no holiday data for some days, counted them as regular days"
        );
    }
    tracing::debug!(
        from = %range.from(),
        to = %range.to(),
        days = days.len(),
        total_seconds = total.num_seconds(),
        "built report"
    );

    Ok(Report {
        range,
        days,
        total,
        hours_per_day: config.hours_per_day,
        lookup_gaps,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::config::CalendarConfig;
    use crate::holiday::NoHolidays;
    use crate::interval::{TimeInterval, bucket_by_day};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap().and_utc()
    }

    fn range(from: NaiveDate, to: NaiveDate) -> DateRange {
        DateRange::new(from, to).unwrap()
    }

    fn worked(entries: &[(NaiveDate, u32, u32)]) -> DailyTotals {
        let intervals: Vec<_> = entries
            .iter()
            .map(|(day, start, end)| {
                TimeInterval::new(
                    day.and_hms_opt(*start, 0, 0).unwrap().and_utc(),
                    day.and_hms_opt(*end, 0, 0).unwrap().and_utc(),
                )
                .unwrap()
            })
            .collect();
        bucket_by_day(&intervals, None, &Utc)
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert_eq!(
            DateRange::new(date(2024, 1, 2), date(2024, 1, 1)),
            Err(ReportError::Range {
                from: date(2024, 1, 2),
                to: date(2024, 1, 1)
            })
        );
        let single = DateRange::day(date(2024, 1, 1));
        assert_eq!(single.days().collect::<Vec<_>>(), vec![date(2024, 1, 1)]);
    }

    #[test]
    fn one_record_per_day_in_ascending_order() {
        let config = CalendarConfig::default();
        let empty: BTreeSet<NaiveDate> = BTreeSet::new();
        let policy = CalendarPolicy::new(&config, &NoHolidays, &empty, &empty);

        let report = build_report(
            range(date(2024, 1, 8), date(2024, 1, 14)),
            &policy,
            &DailyTotals::new(),
        )
        .unwrap();

        let dates: Vec<_> = report.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, range(date(2024, 1, 8), date(2024, 1, 14)).days().collect::<Vec<_>>());
        // Five workdays without any tracked time
        assert_eq!(report.total, Duration::hours(-40));
        assert!(report.lookup_gaps.is_empty());
    }

    #[test]
    fn vacation_credits_work_and_ignored_drops_it() {
        let config = CalendarConfig::default();
        let monday = date(2024, 1, 8);
        let tuesday = date(2024, 1, 9);
        let vacation = BTreeSet::from([monday]);
        let ignored = BTreeSet::from([tuesday]);
        let policy = CalendarPolicy::new(&config, &NoHolidays, &vacation, &ignored);
        let actual = worked(&[(monday, 9, 11), (tuesday, 9, 19)]);

        let report = build_report(range(monday, tuesday), &policy, &actual).unwrap();

        let mon = report.days[0];
        assert_eq!(mon.kind, DayKind::Vacation);
        assert_eq!(mon.expected, Duration::zero());
        assert_eq!(mon.actual, Duration::hours(2));
        assert_eq!(mon.delta, Duration::hours(2));

        let tue = report.days[1];
        assert_eq!(tue.kind, DayKind::Ignored);
        assert_eq!(tue.expected, Duration::zero());
        assert_eq!(tue.tracked, Duration::hours(10));
        assert_eq!(tue.actual, Duration::zero());
        assert_eq!(tue.delta, Duration::zero());

        assert_eq!(report.total, Duration::hours(2));
    }

    #[test]
    fn holidays_and_weekends_credit_work() {
        let config = CalendarConfig::default();
        let holiday = date(2024, 1, 8);
        let saturday = date(2024, 1, 13);
        let holidays = BTreeSet::from([holiday]);
        let empty: BTreeSet<NaiveDate> = BTreeSet::new();
        let policy = CalendarPolicy::new(&config, &holidays, &empty, &empty);
        let actual = worked(&[(holiday, 10, 11), (saturday, 10, 13)]);

        let report = build_report(DateRange::day(holiday), &policy, &actual).unwrap();
        assert_eq!(report.days[0].kind, DayKind::Holiday);
        assert_eq!(report.total, Duration::hours(1));

        let report = build_report(DateRange::day(saturday), &policy, &actual).unwrap();
        assert_eq!(report.days[0].kind, DayKind::Weekend);
        assert_eq!(report.total, Duration::hours(3));
    }

    #[test]
    fn total_is_sum_of_deltas_and_splits_add_up() {
        let config = CalendarConfig {
            hours_per_day: Duration::minutes(7 * 60 + 42),
            ..CalendarConfig::default()
        };
        let vacation = BTreeSet::from([date(2024, 1, 10)]);
        let ignored = BTreeSet::from([date(2024, 1, 16)]);
        let policy = CalendarPolicy::new(&config, &NoHolidays, &vacation, &ignored);
        let actual = bucket_by_day(
            &[
                TimeInterval::new(at(2024, 1, 8, 8), at(2024, 1, 8, 17)).unwrap(),
                TimeInterval::new(at(2024, 1, 11, 22), at(2024, 1, 12, 7)).unwrap(),
                TimeInterval::new(at(2024, 1, 16, 9), at(2024, 1, 16, 12)).unwrap(),
                TimeInterval::new(at(2024, 1, 20, 9), at(2024, 1, 20, 10)).unwrap(),
            ],
            None,
            &Utc,
        );

        let whole = build_report(range(date(2024, 1, 8), date(2024, 1, 21)), &policy, &actual)
            .unwrap();
        let summed: Duration = whole
            .days
            .iter()
            .fold(Duration::zero(), |acc, day| acc + day.delta);
        assert_eq!(summed, whole.total);

        let first = build_report(range(date(2024, 1, 8), date(2024, 1, 14)), &policy, &actual)
            .unwrap();
        let second = build_report(range(date(2024, 1, 15), date(2024, 1, 21)), &policy, &actual)
            .unwrap();
        assert_eq!(first.total + second.total, whole.total);
    }

    #[test]
    fn range_is_clamped_to_inception() {
        let config = CalendarConfig {
            inception: Some(date(2020, 1, 1)),
            ..CalendarConfig::default()
        };
        let empty: BTreeSet<NaiveDate> = BTreeSet::new();
        let policy = CalendarPolicy::new(&config, &NoHolidays, &empty, &empty);

        let report = build_report(
            range(date(2019, 1, 1), date(2020, 6, 1)),
            &policy,
            &DailyTotals::new(),
        )
        .unwrap();
        assert_eq!(report.range.from(), date(2020, 1, 1));
        assert_eq!(report.days[0].date, date(2020, 1, 1));
        assert_eq!(report.days.last().unwrap().date, date(2020, 6, 1));
    }

    #[test]
    fn range_entirely_before_inception_fails() {
        let config = CalendarConfig {
            inception: Some(date(2020, 1, 1)),
            ..CalendarConfig::default()
        };
        let empty: BTreeSet<NaiveDate> = BTreeSet::new();
        let policy = CalendarPolicy::new(&config, &NoHolidays, &empty, &empty);

        let err = build_report(
            range(date(2019, 1, 1), date(2019, 6, 1)),
            &policy,
            &DailyTotals::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReportError::Range {
                from: date(2020, 1, 1),
                to: date(2019, 6, 1)
            }
        );
    }

    #[test]
    fn lookup_gaps_are_reported() {
        let config = CalendarConfig::default();
        let holidays = crate::holiday::GermanHolidays::new(None);
        let empty: BTreeSet<NaiveDate> = BTreeSet::new();
        let policy = CalendarPolicy::new(&config, &holidays, &empty, &empty);

        let report = build_report(
            range(date(1990, 12, 31), date(1991, 1, 2)),
            &policy,
            &DailyTotals::new(),
        )
        .unwrap();
        assert_eq!(report.lookup_gaps, vec![date(1990, 12, 31)]);
        // 1991-01-01 is New Year's Day, 1990-12-31 falls back to a workday
        assert_eq!(report.days[0].kind, DayKind::Workday);
        assert_eq!(report.days[1].kind, DayKind::Holiday);
    }
}
