use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::{
    engine::gate::propose_edit,
    model::{category::Category, settings::Settings, slot::SlotIndex},
    store::{
        day_store::DayStore,
        json_file::{persist_if_dirty, StoreBackend},
    },
};

/// Collaborator that asks the user for a category when none was given on the
/// command line. Returns None when the user cancels with an empty line.
#[cfg_attr(test, mockall::automock)]
pub trait CategoryPrompt {
    fn prompt(&self, current: Option<Category>) -> Result<Option<String>>;
}

pub struct StdinPrompt;

impl CategoryPrompt for StdinPrompt {
    fn prompt(&self, current: Option<Category>) -> Result<Option<String>> {
        match current {
            Some(current) => print!("Activity (A-F) [{current}]: "),
            None => print!("Activity (A-F): "),
        }
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let text = line.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }
}

pub async fn tag_slot(
    backend: &impl StoreBackend,
    settings: &Settings,
    index: SlotIndex,
    value: Option<String>,
    now: DateTime<Local>,
    prompt: &impl CategoryPrompt,
) -> Result<()> {
    let mut store = DayStore::from_snapshot(backend.load().await?);

    let candidate = match value {
        Some(value) => value,
        None => {
            let current = store
                .day(now.date_naive())
                .and_then(|day| day.slot(index).value);
            match prompt.prompt(current)? {
                Some(entered) => entered,
                None => return Ok(()),
            }
        }
    };

    let slot = propose_edit(&mut store, index, &candidate, now, settings)?;
    if let Some(category) = slot.value {
        println!(
            "{} tagged as {}",
            slot.time,
            category.colour().paint(category.code().to_string())
        );
    }
    persist_if_dirty(backend, &mut store).await
}
