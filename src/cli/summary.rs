use anyhow::Result;
use clap::CommandFactory;

use crate::{
    engine::{
        aggregate::{aggregate, CategoryCounts, Granularity},
        resolve::{period_counts, PeriodLabel},
    },
    model::category::Category,
    store::{day_store::DayStore, json_file::StoreBackend},
};

use super::Args;

pub async fn print_summary(backend: &impl StoreBackend, granularity: Granularity) -> Result<()> {
    let store = DayStore::from_snapshot(backend.load().await?);
    let buckets = aggregate(&store, granularity);
    if buckets.is_empty() {
        println!("Nothing recorded yet");
        return Ok(());
    }

    print_header();
    for bucket in &buckets {
        print_row(&bucket.label, &bucket.counts);
    }
    Ok(())
}

pub async fn print_comparison(backend: &impl StoreBackend, labels: &[String]) -> Result<()> {
    let mut periods = Vec::with_capacity(labels.len());
    for raw in labels {
        match raw.parse::<PeriodLabel>() {
            Ok(period) => periods.push(period),
            Err(e) => {
                return Err(Args::command()
                    .error(
                        clap::error::ErrorKind::ValueValidation,
                        format!("Can't compare {raw:?}: {e}"),
                    )
                    .into());
            }
        }
    }

    let store = DayStore::from_snapshot(backend.load().await?);
    print_header();
    for period in &periods {
        print_row(&period.to_string(), &period_counts(period, &store));
    }
    Ok(())
}

fn print_header() {
    print!("{:<12}", "period");
    for category in Category::ALL {
        print!("{:>6}", category.code());
    }
    println!("{:>8}", "total");
}

fn print_row(label: &str, counts: &CategoryCounts) {
    print!("{label:<12}");
    for (_, count) in counts.iter() {
        print!("{count:>6}");
    }
    println!("{:>8}", counts.total());
}
