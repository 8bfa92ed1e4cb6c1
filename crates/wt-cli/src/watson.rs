//! Reads tracked intervals from Watson's data directory.
//!
//! Watson keeps finished frames in `frames`, a JSON array of rows
//! `[start, stop, project, id, tags, updated_at]` with Unix timestamps, and
//! the running frame in `state` (`{"project": ..., "start": ...}`, or `{}`
//! when nothing is running).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use wt_core::TimeInterval;

const FRAMES_FILE: &str = "frames";
const STATE_FILE: &str = "state";

/// The running frame, if any.
#[derive(Debug, Deserialize)]
struct State {
    #[serde(default)]
    start: Option<f64>,
}

/// Converts a Unix timestamp to an instant, dropping fractions of a second.
fn instant(timestamp: f64) -> Option<DateTime<Utc>> {
    #[allow(clippy::cast_possible_truncation)]
    let seconds = timestamp.floor() as i64;
    DateTime::from_timestamp(seconds, 0)
}

fn timestamp_at(row: &[Value], index: usize) -> Option<f64> {
    row.get(index).and_then(Value::as_f64)
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Parses the content of a `frames` file.
fn parse_frames(content: &str) -> Result<Vec<TimeInterval>> {
    let rows: Vec<Vec<Value>> =
        serde_json::from_str(content).context("failed to parse Watson frames")?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let (Some(start), Some(stop)) = (timestamp_at(row, 0), timestamp_at(row, 1)) else {
                anyhow::bail!("frame {index} has no start/stop timestamps");
            };
            let (Some(start), Some(stop)) = (instant(start), instant(stop)) else {
                anyhow::bail!("frame {index} has timestamps out of range");
            };
            TimeInterval::new(start, stop).with_context(|| format!("invalid frame {index}"))
        })
        .collect()
}

/// Parses the content of a `state` file.
fn parse_state(content: &str) -> Result<Option<TimeInterval>> {
    if content.trim().is_empty() {
        return Ok(None);
    }
    let state: State = serde_json::from_str(content).context("failed to parse Watson state")?;
    let Some(start) = state.start else {
        return Ok(None);
    };
    let start = instant(start).context("running frame starts out of range")?;
    Ok(Some(TimeInterval::running(start)))
}

/// Loads all tracked intervals.
///
/// The running frame is only loaded when `include_current` is set. A missing
/// `frames` file means nothing has been tracked yet.
pub fn load_intervals(watson_dir: &Path, include_current: bool) -> Result<Vec<TimeInterval>> {
    let frames_path = watson_dir.join(FRAMES_FILE);
    let mut intervals = match read_optional(&frames_path)? {
        Some(content) => parse_frames(&content)?,
        None => {
            tracing::warn!(path = %frames_path.display(), "no Watson frames found");
            Vec::new()
        }
    };

    if include_current {
        let state_path = watson_dir.join(STATE_FILE);
        if let Some(content) = read_optional(&state_path)? {
            if let Some(running) = parse_state(&content)? {
                tracing::debug!(start = %running.start(), "including running frame");
                intervals.push(running);
            }
        }
    }

    tracing::debug!(count = intervals.len(), "loaded Watson intervals");
    Ok(intervals)
}
