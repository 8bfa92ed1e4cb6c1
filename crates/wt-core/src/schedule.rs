//! Weekly work schedule: the weekdays on which work is expected.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// All weekdays with their lowercase English names, Monday first.
const WEEKDAY_NAMES: [(Weekday, &str); 7] = [
    (Weekday::Mon, "monday"),
    (Weekday::Tue, "tuesday"),
    (Weekday::Wed, "wednesday"),
    (Weekday::Thu, "thursday"),
    (Weekday::Fri, "friday"),
    (Weekday::Sat, "saturday"),
    (Weekday::Sun, "sunday"),
];

/// Parses a weekday name.
///
/// Accepts the full English name or any prefix of at least two letters,
/// case-insensitively ("mo", "Mon", "monday").
pub fn parse_weekday(s: &str) -> Result<Weekday, UnknownWeekday> {
    let needle = s.trim().to_lowercase();
    if needle.len() < 2 {
        return Err(UnknownWeekday(s.to_string()));
    }
    WEEKDAY_NAMES
        .iter()
        .find(|(_, name)| name.starts_with(&needle))
        .map(|(day, _)| *day)
        .ok_or_else(|| UnknownWeekday(s.to_string()))
}

/// Returns the full lowercase name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize].1
}

/// Error type for unrecognised weekday names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWeekday(String);

impl fmt::Display for UnknownWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown weekday: {}", self.0)
    }
}

impl std::error::Error for UnknownWeekday {}

/// The configured working weekdays, in configuration order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkWeek {
    days: Vec<Weekday>,
}

impl WorkWeek {
    /// Builds a work week, dropping repeated days. Returns `None` when empty.
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Option<Self> {
        let mut unique = Vec::new();
        for day in days {
            if !unique.contains(&day) {
                unique.push(day);
            }
        }
        (!unique.is_empty()).then_some(Self { days: unique })
    }

    /// Parses a list of weekday names.
    ///
    /// An empty list yields `Ok(None)`; the caller decides whether that is an error.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Option<Self>, UnknownWeekday> {
        let days = names
            .iter()
            .map(|name| parse_weekday(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(days))
    }

    /// Monday through Friday.
    pub fn monday_to_friday() -> Self {
        Self {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// The first configured workday, which starts the "current work week".
    pub fn first(&self) -> Weekday {
        self.days[0]
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }
}

impl Serialize for WorkWeek {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.days.iter().map(|day| weekday_name(*day)))
    }
}

impl<'de> Deserialize<'de> for WorkWeek {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        Self::parse(&names)
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom("at least one workday is required"))
    }
}
