use std::{fmt::Display, str::FromStr, sync::LazyLock};

use anyhow::anyhow;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{category::Category, settings::Settings};

/// Number of half-hour slots in a day.
pub const SLOT_COUNT: usize = 48;
/// Length of one slot in minutes.
pub const SLOT_MINUTES: i64 = 30;

static SLOT_LABELS: LazyLock<[String; SLOT_COUNT]> = LazyLock::new(|| {
    std::array::from_fn(|i| {
        let hour = i / 2;
        let minute = if i % 2 == 0 { "00" } else { "30" };
        let period = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = if hour % 12 == 0 { 12 } else { hour % 12 };
        format!("{display_hour}:{minute} {period}")
    })
});

/// Index of a half-hour slot, guaranteed to be inside `0..48`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub fn new(value: usize) -> Option<Self> {
        (value < SLOT_COUNT).then_some(Self(value))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// `hour = index / 2`, `minute = (index % 2) * 30`.
    pub fn time_of_day(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.0 as u32 / 2, (self.0 as u32 % 2) * 30, 0)
            .expect("slot indices are always valid half hours")
    }

    /// Human-readable 12-hour label, precomputed for all 48 indices.
    pub fn label(self) -> &'static str {
        &SLOT_LABELS[self.0]
    }

    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..SLOT_COUNT).map(SlotIndex)
    }
}

impl Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SlotIndex {
    type Err = anyhow::Error;

    /// Accepts a raw index like `27` or a half-hour time like `13:30`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(raw) = s.parse::<usize>() {
            return SlotIndex::new(raw).ok_or_else(|| anyhow!("Slot index {raw} is out of range 0-47"));
        }
        let Some((hour, minute)) = s.split_once(':') else {
            return Err(anyhow!("Can't parse {s:?} as a slot index or HH:MM time"));
        };
        let hour = hour.trim().parse::<usize>()?;
        let minute = minute.trim().parse::<usize>()?;
        match (hour, minute) {
            (h, 0) if h < 24 => Ok(SlotIndex(h * 2)),
            (h, 30) if h < 24 => Ok(SlotIndex(h * 2 + 1)),
            _ => Err(anyhow!("{s:?} is not a half-hour boundary")),
        }
    }
}

/// One taggable half hour of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub time: String,
    pub value: Option<Category>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Slot {
    fn empty(index: usize) -> Self {
        Self {
            time: SLOT_LABELS[index].clone(),
            value: None,
            timestamp: None,
        }
    }
}

/// The 48 slots of one calendar day, in fixed chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day {
    slots: Vec<Slot>,
}

impl Day {
    /// Fresh day with the reserved sleep range pre-filled and everything else
    /// empty.
    pub fn materialize(settings: &Settings) -> Self {
        let mut day = Self {
            slots: (0..SLOT_COUNT).map(Slot::empty).collect(),
        };
        for index in SlotIndex::all() {
            if settings.reserved.contains(index) {
                day.slots[index.get()].value = Some(Category::Sleep);
            }
        }
        day
    }

    pub fn slot(&self, index: SlotIndex) -> &Slot {
        &self.slots[index.get()]
    }

    pub(crate) fn slot_mut(&mut self, index: SlotIndex) -> &mut Slot {
        &mut self.slots[index.get()]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Imported days may carry a wrong slot count. Pad or trim back to 48 so
    /// the fixed-width invariant holds everywhere else.
    pub(crate) fn normalize(&mut self) {
        self.slots.truncate(SLOT_COUNT);
        for index in self.slots.len()..SLOT_COUNT {
            self.slots.push(Slot::empty(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        category::Category,
        settings::{ReservedRange, Settings},
    };

    use super::{Day, SlotIndex, SLOT_COUNT};

    fn test_settings(start: usize, end: usize) -> Settings {
        Settings {
            reminder_window_minutes: 10,
            reserved: ReservedRange { start, end },
        }
    }

    #[test]
    fn labels_cover_the_clock() {
        let index = |i: usize| SlotIndex::new(i).unwrap();
        assert_eq!(index(0).label(), "12:00 AM");
        assert_eq!(index(1).label(), "12:30 AM");
        assert_eq!(index(24).label(), "12:00 PM");
        assert_eq!(index(27).label(), "1:30 PM");
        assert_eq!(index(47).label(), "11:30 PM");
    }

    #[test]
    fn index_parses_numbers_and_times() {
        assert_eq!("27".parse::<SlotIndex>().unwrap().get(), 27);
        assert_eq!("13:30".parse::<SlotIndex>().unwrap().get(), 27);
        assert_eq!("0:00".parse::<SlotIndex>().unwrap().get(), 0);
        assert_eq!("23:30".parse::<SlotIndex>().unwrap().get(), 47);
        assert!("48".parse::<SlotIndex>().is_err());
        assert!("13:15".parse::<SlotIndex>().is_err());
        assert!("24:00".parse::<SlotIndex>().is_err());
        assert!("half past one".parse::<SlotIndex>().is_err());
    }

    #[test]
    fn materialized_day_prefills_the_reserved_range() {
        let day = Day::materialize(&test_settings(1, 12));
        assert_eq!(day.slots().len(), SLOT_COUNT);
        assert_eq!(day.slots()[0].value, None);
        for i in 1..=12 {
            assert_eq!(day.slots()[i].value, Some(Category::Sleep), "slot {i}");
            assert_eq!(day.slots()[i].timestamp, None);
        }
        for i in 13..SLOT_COUNT {
            assert_eq!(day.slots()[i].value, None, "slot {i}");
        }
    }

    #[test]
    fn normalize_restores_the_slot_count() {
        let mut short = Day::materialize(&test_settings(0, 3));
        short.slots.truncate(5);
        short.normalize();
        assert_eq!(short.slots().len(), SLOT_COUNT);
        assert_eq!(short.slots()[47].value, None);
        assert_eq!(short.slots()[47].time, "11:30 PM");

        let mut long = Day::materialize(&test_settings(0, 3));
        let extra = long.slots[0].clone();
        long.slots.push(extra);
        long.normalize();
        assert_eq!(long.slots().len(), SLOT_COUNT);
    }
}
