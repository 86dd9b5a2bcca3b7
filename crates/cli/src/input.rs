//! Snapshot files.
//!
//! A snapshot file is a `SnapshotInput` JSON object that may also carry
//! `event_date` and `as_of` (both `YYYY-MM-DD`) in place of a precomputed
//! `days_to_event`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use posture_core::{OptionSnapshot, SnapshotInput};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotFile {
    #[serde(flatten)]
    pub input: SnapshotInput,
    /// Date of the scheduled event.
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    /// Observation date the event distance is measured from. Defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl SnapshotFile {
    /// Fills in `days_to_event` from the dates and validates the snapshot.
    ///
    /// An explicit `days_to_event` wins over `event_date`.
    ///
    /// # Errors
    /// Returns an error if the event date precedes `as_of` or the snapshot is invalid.
    pub fn into_snapshot(self, today: NaiveDate) -> Result<OptionSnapshot> {
        let mut input = self.input;

        if let (None, Some(event_date)) = (input.days_to_event, self.event_date) {
            let as_of = self.as_of.unwrap_or(today);
            let days = (event_date - as_of).num_days();
            if days < 0 {
                bail!("event_date {event_date} is before as_of {as_of}");
            }
            tracing::debug!(%event_date, %as_of, days, "Derived days to event");
            input.days_to_event = Some(days);
            input.upcoming_event = true;
        }

        OptionSnapshot::new(input).context("invalid snapshot")
    }
}

/// Reads and validates one snapshot from a JSON file.
///
/// # Errors
/// Returns an error if the file is missing, malformed or the snapshot invalid.
pub fn read_snapshot(path: &Path, today: NaiveDate) -> Result<OptionSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Snapshot file not found: {}", path.display()))?;
    let file: SnapshotFile = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    file.into_snapshot(today)
}

/// Reads a JSON array of snapshot objects, keeping each entry raw so one bad
/// entry does not sink the whole batch.
///
/// # Errors
/// Returns an error if the file is missing or is not a JSON array.
pub fn read_batch(path: &Path) -> Result<Vec<serde_json::Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Batch file not found: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Batch file {} must hold a JSON array", path.display()))
}

/// Parses and validates one raw batch entry.
///
/// # Errors
/// Returns an error if the entry is malformed or the snapshot invalid.
pub fn parse_entry(value: serde_json::Value, today: NaiveDate) -> Result<OptionSnapshot> {
    let file: SnapshotFile = serde_json::from_value(value).context("malformed snapshot")?;
    file.into_snapshot(today)
}
