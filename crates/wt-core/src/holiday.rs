//! Public holiday lookup.
//!
//! The engine asks a [`HolidaySource`] whether a date is a public holiday.
//! [`HolidayCalendar`] is the source built from configuration: the German
//! federal and state calendar, plus any extra dates the user lists.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use thiserror::Error;

use crate::config::ConfigError;

/// The holiday source cannot answer for this date.
///
/// Callers treat the date as a regular day and report the gap.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no holiday data for {date}")]
pub struct LookupGap {
    pub date: NaiveDate,
}

/// Answers whether a date is a public holiday.
pub trait HolidaySource {
    fn is_holiday(&self, date: NaiveDate) -> Result<bool, LookupGap>;
}

/// A calendar without any holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidaySource for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> Result<bool, LookupGap> {
        Ok(false)
    }
}

/// A fixed set of holiday dates.
impl HolidaySource for BTreeSet<NaiveDate> {
    fn is_holiday(&self, date: NaiveDate) -> Result<bool, LookupGap> {
        Ok(self.contains(&date))
    }
}

/// German federal states, by their two-letter ISO 3166-2 suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GermanState {
    BadenWuerttemberg,
    Bavaria,
    Berlin,
    Brandenburg,
    Bremen,
    Hamburg,
    Hesse,
    MecklenburgVorpommern,
    LowerSaxony,
    NorthRhineWestphalia,
    RhinelandPalatinate,
    Saarland,
    Saxony,
    SaxonyAnhalt,
    SchleswigHolstein,
    Thuringia,
}

impl FromStr for GermanState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let state = match s.trim().to_ascii_uppercase().as_str() {
            "BW" => Self::BadenWuerttemberg,
            "BY" => Self::Bavaria,
            "BE" => Self::Berlin,
            "BB" => Self::Brandenburg,
            "HB" => Self::Bremen,
            "HH" => Self::Hamburg,
            "HE" => Self::Hesse,
            "MV" => Self::MecklenburgVorpommern,
            "NI" => Self::LowerSaxony,
            "NW" => Self::NorthRhineWestphalia,
            "RP" => Self::RhinelandPalatinate,
            "SL" => Self::Saarland,
            "SN" => Self::Saxony,
            "ST" => Self::SaxonyAnhalt,
            "SH" => Self::SchleswigHolstein,
            "TH" => Self::Thuringia,
            _ => return Err(()),
        };
        Ok(state)
    }
}

/// German public holidays, nationwide and optionally for one state.
///
/// Rules are modelled from reunification on; other years are a [`LookupGap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GermanHolidays {
    state: Option<GermanState>,
}

impl GermanHolidays {
    pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1991..=2099;

    pub const fn new(state: Option<GermanState>) -> Self {
        Self { state }
    }

    fn in_state(&self, states: &[GermanState]) -> bool {
        self.state.is_some_and(|state| states.contains(&state))
    }

    /// All holidays of `year`, nationwide and for the configured state.
    fn holidays_in(&self, year: i32) -> Vec<NaiveDate> {
        use GermanState::{
            BadenWuerttemberg, Bavaria, Berlin, Brandenburg, Bremen, Hamburg, Hesse,
            LowerSaxony, MecklenburgVorpommern, NorthRhineWestphalia, RhinelandPalatinate,
            Saarland, Saxony, SaxonyAnhalt, SchleswigHolstein, Thuringia,
        };

        let fixed = |month, day| NaiveDate::from_ymd_opt(year, month, day);
        let easter = easter_sunday(year);
        let from_easter = |offset: i64| {
            easter.and_then(|sunday| {
                if offset < 0 {
                    sunday.checked_sub_days(Days::new(offset.unsigned_abs()))
                } else {
                    sunday.checked_add_days(Days::new(offset.unsigned_abs()))
                }
            })
        };

        let mut days = vec![
            fixed(1, 1),
            from_easter(-2),
            from_easter(1),
            fixed(5, 1),
            from_easter(39),
            from_easter(50),
            fixed(10, 3),
            fixed(12, 25),
            fixed(12, 26),
        ];

        if self.in_state(&[BadenWuerttemberg, Bavaria, SaxonyAnhalt]) {
            days.push(fixed(1, 6));
        }
        if (self.in_state(&[Berlin]) && year >= 2019)
            || (self.in_state(&[MecklenburgVorpommern]) && year >= 2023)
        {
            days.push(fixed(3, 8));
        }
        if self.in_state(&[Brandenburg]) {
            days.push(from_easter(0));
            days.push(from_easter(49));
        }
        if self.in_state(&[Berlin]) && (year == 2020 || year == 2025) {
            days.push(fixed(5, 8));
        }
        if self.in_state(&[
            BadenWuerttemberg,
            Bavaria,
            Hesse,
            NorthRhineWestphalia,
            RhinelandPalatinate,
            Saarland,
        ]) {
            days.push(from_easter(60));
        }
        if self.in_state(&[Saarland]) {
            days.push(fixed(8, 15));
        }
        if self.in_state(&[Thuringia]) && year >= 2019 {
            days.push(fixed(9, 20));
        }
        let reformation = year == 2017
            || self.in_state(&[Brandenburg, MecklenburgVorpommern, Saxony, SaxonyAnhalt, Thuringia])
            || (self.in_state(&[Bremen, Hamburg, LowerSaxony, SchleswigHolstein]) && year >= 2018);
        if reformation {
            days.push(fixed(10, 31));
        }
        if self.in_state(&[
            BadenWuerttemberg,
            Bavaria,
            NorthRhineWestphalia,
            RhinelandPalatinate,
            Saarland,
        ]) {
            days.push(fixed(11, 1));
        }
        // Repentance Day was nationwide until 1994, Saxony kept it.
        if year <= 1994 || self.in_state(&[Saxony]) {
            days.push(repentance_day(year));
        }

        days.into_iter().flatten().collect()
    }
}

impl HolidaySource for GermanHolidays {
    fn is_holiday(&self, date: NaiveDate) -> Result<bool, LookupGap> {
        if !Self::SUPPORTED_YEARS.contains(&date.year()) {
            return Err(LookupGap { date });
        }
        Ok(self.holidays_in(date.year()).contains(&date))
    }
}

/// Easter Sunday in the Gregorian calendar (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// The Wednesday before November 23rd.
fn repentance_day(year: i32) -> Option<NaiveDate> {
    let nov_22 = NaiveDate::from_ymd_opt(year, 11, 22)?;
    let back = (nov_22.weekday().num_days_from_monday() + 7
        - Weekday::Wed.num_days_from_monday())
        % 7;
    nov_22.checked_sub_days(Days::new(u64::from(back)))
}

/// The holiday source assembled from configuration.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    regional: Option<GermanHolidays>,
    extra: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Builds the calendar for a country and optional region.
    ///
    /// Country `none` disables regional holidays, leaving only `extra` dates.
    pub fn new(
        country: &str,
        region: Option<&str>,
        extra: impl IntoIterator<Item = NaiveDate>,
    ) -> Result<Self, ConfigError> {
        let regional = match country.trim().to_ascii_uppercase().as_str() {
            "NONE" => None,
            "DE" => {
                let state = region
                    .filter(|r| !r.trim().is_empty())
                    .map(|r| {
                        r.parse::<GermanState>()
                            .map_err(|()| ConfigError::UnsupportedRegion {
                                country: country.to_string(),
                                region: r.to_string(),
                            })
                    })
                    .transpose()?;
                Some(GermanHolidays::new(state))
            }
            _ => {
                return Err(ConfigError::UnsupportedCountry {
                    country: country.to_string(),
                });
            }
        };
        Ok(Self {
            regional,
            extra: extra.into_iter().collect(),
        })
    }
}

impl HolidaySource for HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> Result<bool, LookupGap> {
        if self.extra.is_holiday(date)? {
            return Ok(true);
        }
        self.regional
            .as_ref()
            .map_or(Ok(false), |calendar| calendar.is_holiday(date))
    }
}
