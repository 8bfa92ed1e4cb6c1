//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wt_core::{CalendarConfig, ConfigError, DayList, HolidayCalendar, TotalFormat, WorkWeek};

/// Name of the configuration file inside the Watson directory.
pub const CONFIG_FILE: &str = "worktime.toml";

/// Prefix for configuration overrides from the environment.
const ENV_PREFIX: &str = "WORKTIME_";

/// Application configuration, as written in `worktime.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// ISO country code for public holidays.
    ///
    /// Only `DE` has a built-in holiday calendar; `none` turns public
    /// holidays off and any other code is rejected.
    pub country: String,

    /// Region or state code within the country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    pub hours_per_day: f64,

    /// Working weekdays by name (`monday`, `tue`, ...).
    pub workdays: Vec<String>,

    pub vacation_per_year: u32,

    pub total_format: TotalFormat,

    pub day_list: DayList,

    /// First day that is ever accounted for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inception: Option<NaiveDate>,

    /// Additional days off that count as holidays.
    #[serde(default)]
    pub extra_holidays: Vec<NaiveDate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: "DE".to_string(),
            state: Some("BW".to_string()),
            hours_per_day: 8.0,
            workdays: ["monday", "tuesday", "wednesday", "thursday", "friday"]
                .map(String::from)
                .to_vec(),
            vacation_per_year: 30,
            total_format: TotalFormat::Exact,
            day_list: DayList::Full,
            inception: None,
            extra_holidays: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration for the given Watson directory.
    ///
    /// Later sources override earlier ones: defaults, `worktime.toml` in the
    /// Watson directory, the file given with `--config`, then `WORKTIME_*`
    /// environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(watson_dir: &Path, config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(watson_dir.join(CONFIG_FILE)));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // WORKTIME_HOURS_PER_DAY -> hours-per-day
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX).map(|key| key.as_str().replace('_', "-").into()),
        );

        figment.extract()
    }

    /// Validates the settings into the engine's calendar configuration.
    pub fn calendar(&self) -> Result<CalendarConfig, ConfigError> {
        let work_week = WorkWeek::parse(&self.workdays)?.ok_or(ConfigError::NoWorkdays)?;
        // Reject unknown countries and regions before any report runs.
        self.holidays()?;

        Ok(CalendarConfig {
            country: self.country.clone(),
            region: self.state.clone(),
            work_week,
            hours_per_day: wt_core::config::hours_per_day(self.hours_per_day)?,
            inception: self.inception,
            vacation_per_year: self.vacation_per_year,
            total_format: self.total_format,
            day_list: self.day_list,
        })
    }

    /// Builds the holiday calendar for the configured country and state.
    pub fn holidays(&self) -> Result<HolidayCalendar, ConfigError> {
        HolidayCalendar::new(
            &self.country,
            self.state.as_deref(),
            self.extra_holidays.iter().copied(),
        )
    }
}

/// Returns the Watson data directory.
///
/// Honours `WATSON_DIR` like Watson itself; otherwise `<config dir>/watson`
/// (on Linux `~/.config/watson`).
pub fn watson_dir() -> Option<PathBuf> {
    match std::env::var_os("WATSON_DIR") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|p| p.join("watson")),
    }
}
