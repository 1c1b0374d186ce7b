pub mod grid;
pub mod summary;
pub mod tag;

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;

use crate::{
    engine::{aggregate::Granularity, sweep::fill_missed},
    model::{settings::Settings, slot::SlotIndex},
    store::{
        day_store::{parse_snapshot, DayStore},
        json_file::{persist_if_dirty, JsonFileBackend, StoreBackend},
    },
    utils::{dir::create_application_default_path, logging::enable_logging},
    watch,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "Slotlog", version, long_about = None)]
#[command(about = "Tag each half hour of your day and see where the time goes", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Show the slot grid for a day")]
    Grid {
        #[arg(
            long,
            help = "Day to show. Examples are \"today\", \"yesterday\", \"15/03/2025\""
        )]
        day: Option<String>,
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
    },
    #[command(about = "Tag one of today's slots with an activity code")]
    Tag {
        #[arg(help = "Slot to tag, as an index 0-47 or a half-hour time like 13:30")]
        slot: SlotIndex,
        #[arg(help = "Activity code A-F. Prompts for one when omitted")]
        value: Option<String>,
    },
    #[command(about = "Per-category totals grouped by week or month")]
    Summary {
        #[arg(short, long, value_enum, default_value_t = Granularity::Week)]
        granularity: Granularity,
    },
    #[command(about = "Compare day, week, or month periods side by side")]
    Compare {
        #[arg(
            required = true,
            help = "Period labels. Examples are \"2025-03-14\", \"2025-03\", \"2025-W11\""
        )]
        labels: Vec<String>,
    },
    #[command(about = "Write the whole store as JSON")]
    Export {
        #[arg(long, help = "Output file. Prints to stdout when omitted")]
        out: Option<PathBuf>,
    },
    #[command(about = "Replace the store with a previously exported file")]
    Import { file: PathBuf },
    #[command(about = "Backfill the missed code into today's lapsed empty slots")]
    Sweep,
    #[command(about = "Keep the store fresh: materialize new days and auto-fill missed slots")]
    Watch,
}

pub async fn run_cli() -> Result<()> {
    let Args { commands, dir, log } = Args::parse();

    let dir = dir.map_or_else(create_application_default_path, Ok)?;
    let logging_level = if log { Some(LevelFilter::TRACE) } else { None };
    enable_logging(&dir, logging_level, log)?;

    let settings = Settings::load(&dir)?;
    let backend = JsonFileBackend::new(&dir)?;

    match commands {
        Commands::Grid { day, date_style } => {
            grid::show_grid(&backend, &settings, day, date_style).await
        }
        Commands::Tag { slot, value } => {
            tag::tag_slot(&backend, &settings, slot, value, Local::now(), &tag::StdinPrompt).await
        }
        Commands::Summary { granularity } => summary::print_summary(&backend, granularity).await,
        Commands::Compare { labels } => summary::print_comparison(&backend, &labels).await,
        Commands::Export { out } => export(&backend, out).await,
        Commands::Import { file } => import(&backend, &file).await,
        Commands::Sweep => sweep(&backend, &settings).await,
        Commands::Watch => watch::start_watch(backend, settings).await,
    }
}

async fn export(backend: &impl StoreBackend, out: Option<PathBuf>) -> Result<()> {
    let snapshot = backend.load().await?;
    let text = serde_json::to_string_pretty(&snapshot)?;
    match out {
        Some(path) => {
            tokio::fs::write(&path, text).await?;
            println!("Exported {} days to {:?}", snapshot.len(), path);
        }
        None => println!("{text}"),
    }
    Ok(())
}

async fn import(backend: &impl StoreBackend, file: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(file).await?;
    // Parse before touching anything, so a bad file leaves the store as is.
    let snapshot = parse_snapshot(&text)?;

    let mut store = DayStore::from_snapshot(backend.load().await?);
    store.replace_all(snapshot);
    persist_if_dirty(backend, &mut store).await?;
    println!("Imported {} days", store.len());
    Ok(())
}

async fn sweep(backend: &impl StoreBackend, settings: &Settings) -> Result<()> {
    let mut store = DayStore::from_snapshot(backend.load().await?);
    let filled = fill_missed(&mut store, Local::now(), settings);
    persist_if_dirty(backend, &mut store).await?;
    println!("Backfilled {filled} missed slots");
    Ok(())
}
