//! Vacation and ignored day files.
//!
//! Each file holds one ISO date per line. On disk the order is irrelevant;
//! in memory the days are a set, and writes always emit them sorted.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fs2::FileExt;

pub const VACATION_FILE: &str = "vacation-days";
pub const IGNORED_FILE: &str = "ignored-days";
const LOCK_FILE: &str = ".worktime.lock";

/// A set of days persisted as a line-oriented file.
#[derive(Debug, Clone)]
pub struct DayStore {
    path: PathBuf,
}

impl DayStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The vacation days of a Watson directory.
    pub fn vacation(watson_dir: &Path) -> Self {
        Self::new(watson_dir.join(VACATION_FILE))
    }

    /// The ignored days of a Watson directory.
    pub fn ignored(watson_dir: &Path) -> Self {
        Self::new(watson_dir.join(IGNORED_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the days. A missing file is an empty set.
    pub fn load(&self) -> Result<BTreeSet<NaiveDate>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", self.path.display()));
            }
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                line.trim().parse::<NaiveDate>().with_context(|| {
                    format!(
                        "invalid date {:?} on line {} of {}",
                        line.trim(),
                        index + 1,
                        self.path.display()
                    )
                })
            })
            .collect()
    }

    fn save(&self, days: &BTreeSet<NaiveDate>) -> Result<()> {
        let mut content = String::new();
        for day in days {
            content.push_str(&day.format("%Y-%m-%d").to_string());
            content.push('\n');
        }
        fs::write(&self.path, content)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// Applies `change` to the stored days under an exclusive lock.
    ///
    /// Returns the number of days added (positive) or removed (negative).
    fn update(&self, change: impl FnOnce(&mut BTreeSet<NaiveDate>)) -> Result<isize> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let lock_file =
            File::create(dir.join(LOCK_FILE)).context("failed to create lock file")?;
        lock_file
            .lock_exclusive()
            .context("failed to acquire lock")?;

        let mut days = self.load()?;
        let before = days.len();
        change(&mut days);
        let after = days.len();

        if before != after {
            self.save(&days)?;
        }
        #[allow(clippy::cast_possible_wrap)]
        Ok(after as isize - before as isize)
    }

    /// Adds days; days already present are left alone.
    pub fn add(&self, new_days: &[NaiveDate]) -> Result<usize> {
        let added = self.update(|days| days.extend(new_days.iter().copied()))?;
        tracing::info!(path = %self.path.display(), added, "added days");
        Ok(added.unsigned_abs())
    }

    /// Removes days; days not present are skipped.
    pub fn remove(&self, old_days: &[NaiveDate]) -> Result<usize> {
        let removed = self.update(|days| {
            for day in old_days {
                days.remove(day);
            }
        })?;
        tracing::info!(path = %self.path.display(), removed = -removed, "removed days");
        Ok(removed.unsigned_abs())
    }
}
