use chrono::{DateTime, Local};
use tracing::debug;

use crate::{
    model::{category::Category, settings::Settings, slot::SlotIndex},
    store::day_store::DayStore,
};

use super::gate::edit_window;

/// Backfills the missed code into every slot of today whose edit window has
/// fully elapsed with no value. Reserved slots are skipped. Returns how many
/// slots were filled; running it again for the same `now` fills nothing.
pub fn fill_missed(store: &mut DayStore, now: DateTime<Local>, settings: &Settings) -> usize {
    let today = now.date_naive();
    let moment = now.naive_local();

    let day = store.get_or_create_day(today, settings);
    let mut filled = 0;
    for index in SlotIndex::all() {
        if settings.reserved.contains(index) {
            continue;
        }
        let (_, until) = edit_window(index, today, settings);
        if moment <= until {
            continue;
        }
        let slot = day.slot_mut(index);
        if slot.value.is_none() {
            slot.value = Some(Category::MISSED);
            slot.timestamp = Some(now.to_utc());
            filled += 1;
        }
    }

    if filled > 0 {
        debug!("backfilled {filled} missed slots for {today}");
        store.mark_dirty();
    }
    filled
}
