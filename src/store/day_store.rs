use std::collections::{btree_map::Entry, BTreeMap};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::model::{settings::Settings, slot::Day};

/// The export payload and on-disk shape: every known day keyed by its
/// calendar date. Round-trips through import without loss.
pub type Snapshot = BTreeMap<NaiveDate, Day>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import payload is not a mapping of day keys to slot arrays: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parses an exported snapshot. Rejects anything that isn't a mapping of day
/// keys to slot arrays; deeper slot validation is intentionally shallow.
pub fn parse_snapshot(text: &str) -> Result<Snapshot, ImportError> {
    Ok(serde_json::from_str(text)?)
}

/// Every recorded day. The single mutable aggregate of the application,
/// passed explicitly into each operation that reads or writes it.
#[derive(Debug, Default)]
pub struct DayStore {
    days: Snapshot,
    dirty: bool,
}

impl DayStore {
    pub fn from_snapshot(mut snapshot: Snapshot) -> Self {
        for day in snapshot.values_mut() {
            day.normalize();
        }
        Self {
            days: snapshot,
            dirty: false,
        }
    }

    /// Lazily materializes the day on first access, pre-filling the reserved
    /// range. Calling it again for the same key returns the day unchanged.
    pub fn get_or_create_day(&mut self, date: NaiveDate, settings: &Settings) -> &mut Day {
        match self.days.entry(date) {
            Entry::Vacant(entry) => {
                debug!("materializing day {date}");
                self.dirty = true;
                entry.insert(Day::materialize(settings))
            }
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.get(&date)
    }

    /// Day keys in ascending calendar order.
    pub fn keys(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &Day)> {
        self.days.iter().map(|(date, day)| (*date, day))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Wholesale replacement, used by import.
    pub fn replace_all(&mut self, mut snapshot: Snapshot) {
        for day in snapshot.values_mut() {
            day.normalize();
        }
        self.days = snapshot;
        self.dirty = true;
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.days
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
