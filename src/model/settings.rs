use std::{io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::slot::SlotIndex;

/// Inclusive slot-index range that is pre-filled with the sleep code and can
/// never be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedRange {
    pub start: usize,
    pub end: usize,
}

impl ReservedRange {
    pub fn contains(&self, index: SlotIndex) -> bool {
        (self.start..=self.end).contains(&index.get())
    }
}

pub const SETTINGS_FILE: &str = "settings.json";

/// Process-wide configuration, loaded once at startup and read-only after.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How many minutes before a slot starts it becomes editable.
    pub reminder_window_minutes: u32,
    /// Sleep hours, midnight through 06:30 by default.
    pub reserved: ReservedRange,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminder_window_minutes: 10,
            reserved: ReservedRange { start: 0, end: 13 },
        }
    }
}

impl Settings {
    /// Reads `settings.json` from the application directory, falling back to
    /// the defaults when the file doesn't exist.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text).with_context(|| format!("Can't parse settings file {path:?}"))
    }
}
