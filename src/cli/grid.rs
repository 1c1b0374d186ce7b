use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;

use crate::{
    engine::gate,
    model::{period::day_key, settings::Settings, slot::SlotIndex},
    store::{
        day_store::DayStore,
        json_file::{persist_if_dirty, StoreBackend},
    },
};

use super::DateStyle;

/// Renders one day's 48 slots. Viewing a day materializes it, the same way
/// the grid always showed a full day.
pub async fn show_grid(
    backend: &impl StoreBackend,
    settings: &Settings,
    day: Option<String>,
    date_style: DateStyle,
) -> Result<()> {
    let now = Local::now();
    let date = parse_day(day, now, date_style)?;

    let mut store = DayStore::from_snapshot(backend.load().await?);
    store.get_or_create_day(date, settings);

    println!("{}", day_key(date));
    if let Some(day) = store.day(date) {
        for index in SlotIndex::all() {
            let slot = day.slot(index);
            let cell = match slot.value {
                Some(category) => category
                    .colour()
                    .paint(category.code().to_string())
                    .to_string(),
                None => ".".to_string(),
            };
            let editable = date == now.date_naive() && gate::is_editable(index, now, settings);
            let marker = if editable { "  *" } else { "" };
            println!("{:>2}  {:<9}{}{}", index.get(), index.label(), cell, marker);
        }
    }
    persist_if_dirty(backend, &mut store).await
}

fn parse_day(day: Option<String>, now: DateTime<Local>, date_style: DateStyle) -> Result<NaiveDate> {
    let Some(day) = day else {
        return Ok(now.date_naive());
    };
    let parsed = parse_date_string(&day, now, date_style.into())
        .map_err(|e| anyhow!("Can't parse day {day:?}: {e}"))?;
    Ok(parsed.date_naive())
}
