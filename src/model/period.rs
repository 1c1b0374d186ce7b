use std::fmt::Display;

use chrono::{Datelike, Duration, NaiveDate};

/// This is the standard way of converting a date to a day key in slotlog.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Month bucket key, the first seven characters of a day key.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// An ISO week carried together with its ISO year, so that week 5 of two
/// different years can never collapse into one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

/// ISO-8601 week of a date: shift to the Thursday of the same week, then
/// count weeks from January 1st of the Thursday's year. Week 1 is the week
/// containing the year's first Thursday, so late-December dates can land in
/// week 1 of the following year.
pub fn week_of(date: NaiveDate) -> WeekKey {
    let offset = 4 - date.weekday().number_from_monday() as i64;
    let thursday = date + Duration::days(offset);
    let jan1 =
        NaiveDate::from_ymd_opt(thursday.year(), 1, 1).expect("January 1st always exists");
    let day_of_year = (thursday - jan1).num_days() + 1;
    WeekKey {
        year: thursday.year(),
        // Ceiling division; day_of_year is at least 1.
        week: ((day_of_year + 6) / 7) as u32,
    }
}
