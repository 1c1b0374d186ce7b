use std::{collections::BTreeMap, fmt::Display, ops::AddAssign};

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::{
    model::{
        category::Category,
        period::{month_key, week_of},
        slot::Slot,
    },
    store::day_store::DayStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Granularity {
    Week,
    Month,
}

impl Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

/// Per-category tally in the fixed legend order, zero-filled for unseen
/// categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryCounts([u32; Category::ALL.len()]);

impl CategoryCounts {
    pub fn get(&self, category: Category) -> u32 {
        self.0[category as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.iter().map(|c| (*c, self.0[*c as usize]))
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    fn add(&mut self, category: Category) {
        self.0[category as usize] += 1;
    }
}

impl AddAssign for CategoryCounts {
    fn add_assign(&mut self, rhs: Self) {
        for (count, extra) in self.0.iter_mut().zip(rhs.0) {
            *count += extra;
        }
    }
}

/// Shared tallying routine of the aggregator and the period resolver, so
/// both presentations always agree on totals.
pub fn count_by_category<'a>(slots: impl IntoIterator<Item = &'a Slot>) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for slot in slots {
        if let Some(value) = slot.value {
            counts.add(value);
        }
    }
    counts
}

/// One aggregation unit: an ISO week or a calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub counts: CategoryCounts,
}

/// Groups every recorded day into week or month buckets, ascending by bucket
/// key. Read-only; the total of a bucket equals the number of non-empty slots
/// its days contributed.
pub fn aggregate(store: &DayStore, granularity: Granularity) -> Vec<Bucket> {
    match granularity {
        Granularity::Week => buckets(store, week_of),
        Granularity::Month => buckets(store, month_key),
    }
}

fn buckets<K: Ord + Display>(store: &DayStore, key_of: impl Fn(NaiveDate) -> K) -> Vec<Bucket> {
    let mut map = BTreeMap::<K, CategoryCounts>::new();
    for (date, day) in store.iter() {
        *map.entry(key_of(date)).or_default() += count_by_category(day.slots());
    }
    map.into_iter()
        .map(|(key, counts)| Bucket {
            label: key.to_string(),
            counts,
        })
        .collect()
}
