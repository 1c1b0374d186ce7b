use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::{
    model::{
        period::{week_of, WeekKey},
        slot::Slot,
    },
    store::day_store::DayStore,
};

use super::aggregate::{count_by_category, CategoryCounts};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodParseError {
    #[error("{0:?} is not a day (YYYY-MM-DD), month (YYYY-MM), or week (YYYY-Www) label")]
    UnrecognizedShape(String),
    #[error("week labels need a year, like 2024-W05")]
    MissingWeekYear,
    #[error("{0:?} is outside the calendar")]
    OutOfRange(String),
}

/// A comparison period, parsed once at the boundary instead of shape-sniffed
/// at every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodLabel {
    Day(NaiveDate),
    Week(WeekKey),
    Month { year: i32, month: u32 },
}

impl Display for PeriodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodLabel::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodLabel::Week(week) => write!(f, "{week}"),
            PeriodLabel::Month { year, month } => write!(f, "{year:04}-{month:02}"),
        }
    }
}

impl FromStr for PeriodLabel {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self::Day(date));
        }
        if let Some(week) = parse_week(trimmed)? {
            return Ok(Self::Week(week));
        }
        if let Some((year, month)) = parse_month(trimmed)? {
            return Ok(Self::Month { year, month });
        }
        if trimmed.to_ascii_lowercase().starts_with("week") {
            // The old bare "week N" shape can't name a unique week.
            return Err(PeriodParseError::MissingWeekYear);
        }
        Err(PeriodParseError::UnrecognizedShape(s.to_string()))
    }
}

fn parse_week(s: &str) -> Result<Option<WeekKey>, PeriodParseError> {
    let Some((year, week)) = s.split_once("-W").or_else(|| s.split_once("-w")) else {
        return Ok(None);
    };
    let (Ok(year), Ok(week)) = (year.parse::<i32>(), week.parse::<u32>()) else {
        return Ok(None);
    };
    if (1..=53).contains(&week) {
        Ok(Some(WeekKey { year, week }))
    } else {
        Err(PeriodParseError::OutOfRange(s.to_string()))
    }
}

fn parse_month(s: &str) -> Result<Option<(i32, u32)>, PeriodParseError> {
    let Some((year, month)) = s.split_once('-') else {
        return Ok(None);
    };
    let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>()) else {
        return Ok(None);
    };
    if (1..=12).contains(&month) {
        Ok(Some((year, month)))
    } else {
        Err(PeriodParseError::OutOfRange(s.to_string()))
    }
}

/// The flat slot sequence a period denotes, in ascending day order.
pub fn resolve<'a>(label: &PeriodLabel, store: &'a DayStore) -> Vec<&'a Slot> {
    match label {
        PeriodLabel::Day(date) => store
            .day(*date)
            .map(|day| day.slots().iter().collect())
            .unwrap_or_default(),
        PeriodLabel::Week(week) => days_where(store, |date| week_of(date) == *week),
        PeriodLabel::Month { year, month } => {
            days_where(store, |date| date.year() == *year && date.month() == *month)
        }
    }
}

fn days_where<'a>(store: &'a DayStore, predicate: impl Fn(NaiveDate) -> bool) -> Vec<&'a Slot> {
    store
        .iter()
        .filter(|(date, _)| predicate(*date))
        .flat_map(|(_, day)| day.slots())
        .collect()
}

/// Category totals for one period, using the same tallying routine the
/// aggregator applies per bucket.
pub fn period_counts(label: &PeriodLabel, store: &DayStore) -> CategoryCounts {
    count_by_category(resolve(label, store))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        model::{
            category::Category,
            period::WeekKey,
            settings::{ReservedRange, Settings},
            slot::{SlotIndex, SLOT_COUNT},
        },
        store::day_store::DayStore,
    };

    use super::{period_counts, resolve, PeriodLabel, PeriodParseError};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn test_settings() -> Settings {
        Settings {
            reminder_window_minutes: 10,
            reserved: ReservedRange { start: 0, end: 1 },
        }
    }

    fn tag(store: &mut DayStore, settings: &Settings, day: NaiveDate, index: usize, value: Category) {
        let day = store.get_or_create_day(day, settings);
        day.slot_mut(SlotIndex::new(index).unwrap()).value = Some(value);
    }

    #[test]
    fn parses_all_three_shapes() {
        assert_eq!(
            "2024-03-14".parse::<PeriodLabel>(),
            Ok(PeriodLabel::Day(date(2024, 3, 14)))
        );
        assert_eq!(
            "2024-03".parse::<PeriodLabel>(),
            Ok(PeriodLabel::Month { year: 2024, month: 3 })
        );
        assert_eq!(
            "2024-W05".parse::<PeriodLabel>(),
            Ok(PeriodLabel::Week(WeekKey { year: 2024, week: 5 }))
        );
        assert_eq!(
            "2024-w5".parse::<PeriodLabel>(),
            Ok(PeriodLabel::Week(WeekKey { year: 2024, week: 5 }))
        );
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        assert_eq!(
            "march".parse::<PeriodLabel>(),
            Err(PeriodParseError::UnrecognizedShape("march".to_string()))
        );
        assert_eq!(
            "week 5".parse::<PeriodLabel>(),
            Err(PeriodParseError::MissingWeekYear)
        );
        assert_eq!(
            "2024-13".parse::<PeriodLabel>(),
            Err(PeriodParseError::OutOfRange("2024-13".to_string()))
        );
        assert_eq!(
            "2024-W54".parse::<PeriodLabel>(),
            Err(PeriodParseError::OutOfRange("2024-W54".to_string()))
        );
        assert!("2024-02-30".parse::<PeriodLabel>().is_err());
    }

    #[test]
    fn month_resolves_to_days_in_ascending_order() {
        let settings = test_settings();
        let mut store = DayStore::default();
        tag(&mut store, &settings, date(2024, 3, 20), 10, Category::B);
        tag(&mut store, &settings, date(2024, 3, 4), 10, Category::A);
        tag(&mut store, &settings, date(2024, 4, 1), 10, Category::C);

        let label = "2024-03".parse::<PeriodLabel>().unwrap();
        let slots = resolve(&label, &store);
        assert_eq!(slots.len(), 2 * SLOT_COUNT);
        // March 4th comes first even though the 20th was recorded first.
        assert_eq!(slots[10].value, Some(Category::A));
        assert_eq!(slots[SLOT_COUNT + 10].value, Some(Category::B));
    }

    #[test]
    fn absent_day_resolves_to_nothing() {
        let store = DayStore::default();
        let label = "2024-03-14".parse::<PeriodLabel>().unwrap();
        assert!(resolve(&label, &store).is_empty());
    }

    #[test]
    fn week_resolution_respects_the_year() {
        let settings = test_settings();
        let mut store = DayStore::default();
        // ISO week 5 of 2023 and of 2024.
        tag(&mut store, &settings, date(2023, 2, 1), 10, Category::A);
        tag(&mut store, &settings, date(2024, 2, 1), 10, Category::B);

        let label = "2024-W05".parse::<PeriodLabel>().unwrap();
        let counts = period_counts(&label, &store);
        assert_eq!(counts.get(Category::A), 0);
        assert_eq!(counts.get(Category::B), 1);
    }

    #[test]
    fn resolver_and_aggregator_agree() {
        use crate::engine::aggregate::{aggregate, Granularity};

        let settings = test_settings();
        let mut store = DayStore::default();
        tag(&mut store, &settings, date(2024, 3, 4), 10, Category::A);
        tag(&mut store, &settings, date(2024, 3, 20), 11, Category::B);

        let buckets = aggregate(&store, Granularity::Month);
        let label = "2024-03".parse::<PeriodLabel>().unwrap();
        assert_eq!(buckets[0].counts, period_counts(&label, &store));
    }
}
