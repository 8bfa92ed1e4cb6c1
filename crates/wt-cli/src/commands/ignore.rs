//! Ignore and unignore commands.
//!
//! Tracked time on an ignored day is not credited and nothing is expected.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

use crate::store::DayStore;

pub fn ignore<W: Write>(writer: &mut W, watson_dir: &Path, days: &[NaiveDate]) -> Result<()> {
    let added = DayStore::ignored(watson_dir).add(days)?;
    writeln!(writer, "Ignoring {added} more day(s)")?;
    Ok(())
}

pub fn unignore<W: Write>(writer: &mut W, watson_dir: &Path, days: &[NaiveDate]) -> Result<()> {
    let removed = DayStore::ignored(watson_dir).remove(days)?;
    writeln!(writer, "No longer ignoring {removed} day(s)")?;
    Ok(())
}
