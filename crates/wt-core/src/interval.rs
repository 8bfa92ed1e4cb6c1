//! Tracked time intervals and their per-day totals.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IntervalError {
    #[error("interval ends at {end} before it starts at {start}")]
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A span of tracked work between two absolute instants.
///
/// An interval without an end is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl TimeInterval {
    /// A finished interval. `end` must not lie before `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if end < start {
            return Err(IntervalError::EndBeforeStart { start, end });
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// An interval that has started but not stopped yet.
    pub const fn running(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub const fn is_running(&self) -> bool {
        self.end.is_none()
    }
}

/// Tracked time per civil day. Days without tracked time are absent.
pub type DailyTotals = BTreeMap<NaiveDate, Duration>;

/// The first instant of the day after `day` in `tz`.
///
/// When midnight falls into a DST gap the day starts once the gap is over.
fn start_of_next_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = day.succ_opt()?.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|start| start.with_timezone(&Utc))
}

/// Sums tracked time per civil day of `tz`.
///
/// Intervals are split at local midnight, so an interval from 23:00 to 02:00
/// gives one hour to the first day and two to the second. Durations are
/// measured between instants, so days with a DST change count real time.
/// Overlapping intervals are summed as given.
///
/// Running intervals count only when `running_until` is given; they are then
/// closed at that instant.
pub fn bucket_by_day<Tz: TimeZone>(
    intervals: &[TimeInterval],
    running_until: Option<DateTime<Utc>>,
    tz: &Tz,
) -> DailyTotals {
    let mut totals = DailyTotals::new();

    for interval in intervals {
        let Some(end) = interval.end.or(running_until) else {
            continue;
        };

        let mut cursor = interval.start;
        while cursor < end {
            let day = cursor.with_timezone(tz).date_naive();
            let segment_end = start_of_next_day(day, tz)
                .filter(|next| *next > cursor)
                .map_or(end, |next| end.min(next));
            *totals.entry(day).or_insert_with(Duration::zero) += segment_end - cursor;
            cursor = segment_end;
        }
    }

    totals
}

/// Tracked time on `date`, zero when nothing was tracked.
pub fn tracked_on(totals: &DailyTotals, date: NaiveDate) -> Duration {
    totals.get(&date).copied().unwrap_or_else(Duration::zero)
}

#[cfg(test)]
mod tests {
    use chrono::offset::LocalResult;
    use chrono::{FixedOffset, NaiveDateTime};

    use super::*;

    /// Central European time with the 2024 switches: CEST from
    /// 2024-03-31 01:00 UTC until 2024-10-27 01:00 UTC.
    #[derive(Debug, Clone, Copy)]
    struct Berlin2024;

    impl Berlin2024 {
        fn offset_at(utc: &NaiveDateTime) -> FixedOffset {
            let summer_start = NaiveDate::from_ymd_opt(2024, 3, 31)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap();
            let summer_end = NaiveDate::from_ymd_opt(2024, 10, 27)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap();
            let hours = if (summer_start..summer_end).contains(utc) { 2 } else { 1 };
            FixedOffset::east_opt(hours * 3600).unwrap()
        }
    }

    impl TimeZone for Berlin2024 {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            Self
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            // Candidates in order of the instant they denote, earliest first.
            let fits: Vec<FixedOffset> = [2, 1]
                .into_iter()
                .map(|hours| FixedOffset::east_opt(hours * 3600).unwrap())
                .filter(|offset| Self::offset_at(&(*local - *offset)) == *offset)
                .collect();
            match fits[..] {
                [] => LocalResult::None,
                [only] => LocalResult::Single(only),
                [earlier, later, ..] => LocalResult::Ambiguous(earlier, later),
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            Self::offset_at(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            Self::offset_at(utc)
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .and_utc()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_end_before_start() {
        let err = TimeInterval::new(at(2024, 1, 8, 10, 0), at(2024, 1, 8, 9, 0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "interval ends at 2024-01-08 09:00:00 UTC before it starts at 2024-01-08 10:00:00 UTC"
        );
    }

    #[test]
    fn interval_across_new_year_is_split_at_midnight() {
        let interval = TimeInterval::new(at(2022, 12, 31, 23, 0), at(2023, 1, 1, 2, 0)).unwrap();
        let totals = bucket_by_day(&[interval], None, &Utc);

        assert_eq!(totals.len(), 2);
        assert_eq!(tracked_on(&totals, day(2022, 12, 31)), Duration::hours(1));
        assert_eq!(tracked_on(&totals, day(2023, 1, 1)), Duration::hours(2));
    }

    #[test]
    fn midnight_is_local_to_the_time_zone() {
        // 21:00-01:00 UTC is 23:00-03:00 at UTC+2
        let interval = TimeInterval::new(at(2024, 1, 8, 21, 0), at(2024, 1, 9, 1, 0)).unwrap();
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let totals = bucket_by_day(&[interval], None, &tz);

        assert_eq!(tracked_on(&totals, day(2024, 1, 8)), Duration::hours(1));
        assert_eq!(tracked_on(&totals, day(2024, 1, 9)), Duration::hours(3));
    }

    #[test]
    fn multi_day_interval_fills_whole_days() {
        let interval = TimeInterval::new(at(2024, 1, 8, 12, 0), at(2024, 1, 10, 6, 30)).unwrap();
        let totals = bucket_by_day(&[interval], None, &Utc);

        assert_eq!(tracked_on(&totals, day(2024, 1, 8)), Duration::hours(12));
        assert_eq!(tracked_on(&totals, day(2024, 1, 9)), Duration::hours(24));
        assert_eq!(tracked_on(&totals, day(2024, 1, 10)), Duration::minutes(390));
    }

    #[test]
    fn fall_back_counts_the_repeated_hour() {
        // 01:00 CEST to 04:00 CET on 2024-10-27 is four real hours
        let interval = TimeInterval::new(at(2024, 10, 26, 23, 0), at(2024, 10, 27, 3, 0)).unwrap();
        let totals = bucket_by_day(&[interval], None, &Berlin2024);
        assert_eq!(totals.len(), 1);
        assert_eq!(tracked_on(&totals, day(2024, 10, 27)), Duration::hours(4));

        // 02:30 CEST to 02:10 CET: the wall clock goes back, real time does not
        let interval =
            TimeInterval::new(at(2024, 10, 27, 0, 30), at(2024, 10, 27, 1, 10)).unwrap();
        let totals = bucket_by_day(&[interval], None, &Berlin2024);
        assert_eq!(tracked_on(&totals, day(2024, 10, 27)), Duration::minutes(40));
    }

    #[test]
    fn spring_forward_skips_the_missing_hour() {
        // 00:00 CET to 04:00 CEST on 2024-03-31 is three real hours
        let interval = TimeInterval::new(at(2024, 3, 30, 23, 0), at(2024, 3, 31, 2, 0)).unwrap();
        let totals = bucket_by_day(&[interval], None, &Berlin2024);
        assert_eq!(totals.len(), 1);
        assert_eq!(tracked_on(&totals, day(2024, 3, 31)), Duration::hours(3));

        // 22:00 CET on the 30th to 04:00 CEST on the 31st splits 2h + 3h
        let interval = TimeInterval::new(at(2024, 3, 30, 21, 0), at(2024, 3, 31, 2, 0)).unwrap();
        let totals = bucket_by_day(&[interval], None, &Berlin2024);
        assert_eq!(tracked_on(&totals, day(2024, 3, 30)), Duration::hours(2));
        assert_eq!(tracked_on(&totals, day(2024, 3, 31)), Duration::hours(3));
    }

    #[test]
    fn interval_ending_at_midnight_leaves_next_day_empty() {
        let interval = TimeInterval::new(at(2024, 1, 8, 22, 0), at(2024, 1, 9, 0, 0)).unwrap();
        let totals = bucket_by_day(&[interval], None, &Utc);

        assert_eq!(totals.len(), 1);
        assert!(!totals.contains_key(&day(2024, 1, 9)));
    }

    #[test]
    fn overlapping_intervals_are_summed() {
        let intervals = [
            TimeInterval::new(at(2024, 1, 8, 9, 0), at(2024, 1, 8, 12, 0)).unwrap(),
            TimeInterval::new(at(2024, 1, 8, 11, 0), at(2024, 1, 8, 13, 0)).unwrap(),
        ];
        let totals = bucket_by_day(&intervals, None, &Utc);
        assert_eq!(tracked_on(&totals, day(2024, 1, 8)), Duration::hours(5));
    }

    #[test]
    fn zero_length_intervals_do_not_create_entries() {
        let interval = TimeInterval::new(at(2024, 1, 8, 9, 0), at(2024, 1, 8, 9, 0)).unwrap();
        assert!(bucket_by_day(&[interval], None, &Utc).is_empty());
        assert_eq!(tracked_on(&DailyTotals::new(), day(2024, 1, 8)), Duration::zero());
    }

    #[test]
    fn running_interval_is_opt_in() {
        let running = TimeInterval::running(at(2024, 1, 8, 9, 0));
        assert!(running.is_running());

        assert!(bucket_by_day(&[running], None, &Utc).is_empty());

        let totals = bucket_by_day(&[running], Some(at(2024, 1, 8, 10, 15)), &Utc);
        assert_eq!(tracked_on(&totals, day(2024, 1, 8)), Duration::minutes(75));
    }

    #[test]
    fn running_interval_starting_after_now_contributes_nothing() {
        let running = TimeInterval::running(at(2024, 1, 8, 9, 0));
        let totals = bucket_by_day(&[running], Some(at(2024, 1, 8, 8, 0)), &Utc);
        assert!(totals.is_empty());
    }
}
