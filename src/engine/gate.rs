use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

use crate::{
    model::{
        category::Category,
        settings::Settings,
        slot::{Slot, SlotIndex, SLOT_MINUTES},
    },
    store::day_store::DayStore,
};

/// User-input rejections for a slot edit. None of these leave the store
/// modified; the caller re-prompts or shows the message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("slot {0} is inside the reserved sleep range")]
    ReservedSlot(SlotIndex),
    #[error("slot {index} can only be edited between {from} and {until}")]
    OutOfWindow {
        index: SlotIndex,
        from: NaiveDateTime,
        until: NaiveDateTime,
    },
    #[error("{0:?} is not one of the activity codes A-F")]
    InvalidCategory(String),
}

/// Inclusive wall-clock range during which a slot of `day` may be edited:
/// from reminder-window minutes before the slot starts until the slot ends.
pub fn edit_window(
    index: SlotIndex,
    day: NaiveDate,
    settings: &Settings,
) -> (NaiveDateTime, NaiveDateTime) {
    let start = NaiveDateTime::new(day, index.time_of_day());
    (
        start - Duration::minutes(settings.reminder_window_minutes as i64),
        start + Duration::minutes(SLOT_MINUTES),
    )
}

/// Whether a user edit of today's slot would currently pass the time gate.
pub fn is_editable(index: SlotIndex, now: DateTime<Local>, settings: &Settings) -> bool {
    if settings.reserved.contains(index) {
        return false;
    }
    let (from, until) = edit_window(index, now.date_naive(), settings);
    let moment = now.naive_local();
    from <= moment && moment <= until
}

/// Validates and applies a user edit to one of today's slots. The store is
/// only touched after every check has passed.
pub fn propose_edit<'a>(
    store: &'a mut DayStore,
    index: SlotIndex,
    candidate: &str,
    now: DateTime<Local>,
    settings: &Settings,
) -> Result<&'a Slot, EditError> {
    if settings.reserved.contains(index) {
        return Err(EditError::ReservedSlot(index));
    }
    let (from, until) = edit_window(index, now.date_naive(), settings);
    let moment = now.naive_local();
    if moment < from || moment > until {
        return Err(EditError::OutOfWindow { index, from, until });
    }
    let value = parse_category(candidate)?;

    debug!("tagging slot {index} of {} as {value}", now.date_naive());
    store.mark_dirty();
    let day = store.get_or_create_day(now.date_naive(), settings);
    let slot = day.slot_mut(index);
    slot.value = Some(value);
    slot.timestamp = Some(now.to_utc());
    Ok(slot)
}

fn parse_category(candidate: &str) -> Result<Category, EditError> {
    let trimmed = candidate.trim();
    let mut chars = trimmed.chars();
    let (Some(code), None) = (chars.next(), chars.next()) else {
        return Err(EditError::InvalidCategory(candidate.to_string()));
    };
    Category::from_user_code(code).ok_or_else(|| EditError::InvalidCategory(candidate.to_string()))
}
