pub mod shutdown;

use std::time::Duration;

use anyhow::Result;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    engine::sweep::fill_missed,
    model::settings::Settings,
    store::{
        day_store::DayStore,
        json_file::{persist_if_dirty, StoreBackend},
    },
    utils::clock::{Clock, DefaultClock},
};

/// How often the date is checked for a rollover into a new day.
const ROLLOVER_INTERVAL: Duration = Duration::from_secs(60);
/// How often lapsed empty slots are backfilled with the missed code.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Foreground entry point for the timer loop, stopped with Ctrl-C.
pub async fn start_watch(backend: impl StoreBackend, settings: Settings) -> Result<()> {
    let token = CancellationToken::new();

    let watch_token = token.clone();
    let (_, run_result) = tokio::join!(
        shutdown::detect_shutdown(token.clone()),
        async {
            let result = run_watch(&backend, &settings, &DefaultClock, watch_token.clone()).await;
            // Unblocks the signal listener when the loop dies on its own.
            watch_token.cancel();
            result
        },
    );

    if let Err(e) = &run_result {
        error!("Watch loop got an error {e:?}");
    }
    run_result.map(|_| ())
}

/// Runs the two periodic timers until cancelled: a day-boundary check that
/// materializes the new day when the date rolls over, and the auto-fill
/// sweep. Both are idempotent and safe to run redundantly; every mutation is
/// persisted before the next tick.
pub async fn run_watch(
    backend: &impl StoreBackend,
    settings: &Settings,
    clock: &impl Clock,
    token: CancellationToken,
) -> Result<DayStore> {
    let mut store = DayStore::from_snapshot(backend.load().await?);
    info!("watching with {} recorded days", store.len());

    let mut rollover = tokio::time::interval(ROLLOVER_INTERVAL);
    let mut sweeper = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        select! {
            // Cancellation wins over a pending tick.
            biased;
            _ = token.cancelled() => break,
            _ = rollover.tick() => {
                store.get_or_create_day(clock.now().date_naive(), settings);
            }
            _ = sweeper.tick() => {
                let filled = fill_missed(&mut store, clock.now(), settings);
                if filled > 0 {
                    info!("backfilled {filled} missed slots");
                }
            }
        }
        persist_if_dirty(backend, &mut store).await?;
    }
    persist_if_dirty(backend, &mut store).await?;

    Ok(store)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
    use tokio_util::sync::CancellationToken;

    use crate::{
        model::{category::Category, settings::Settings, slot::SlotIndex},
        store::{day_store::Snapshot, json_file::MockStoreBackend},
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    use super::run_watch;

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();

    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }

    fn noon() -> DateTime<Local> {
        let moment = NaiveDateTime::new(TEST_DATE, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        Local.from_local_datetime(&moment).single().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn watch_materializes_and_backfills_today() -> Result<()> {
        *TEST_LOGGING;

        let mut backend = MockStoreBackend::new();
        backend.expect_load().returning(|| Ok(Snapshot::new()));
        backend.expect_save().returning(|_| Ok(()));

        let token = CancellationToken::new();
        let clock = FixedClock(noon());
        let settings = Settings::default();

        let (_, store) = tokio::join!(
            async {
                // Let both timers fire a second time before shutting down.
                tokio::time::sleep(Duration::from_secs(301)).await;
                token.cancel();
            },
            run_watch(&backend, &settings, &clock, token.clone()),
        );
        let store = store?;

        assert_eq!(store.len(), 1);
        let day = store.day(TEST_DATE).unwrap();
        assert_eq!(day.slot(SlotIndex::new(0).unwrap()).value, Some(Category::Sleep));
        assert_eq!(
            day.slot(SlotIndex::new(14).unwrap()).value,
            Some(Category::MISSED)
        );
        assert_eq!(day.slot(SlotIndex::new(24).unwrap()).value, None);
        assert!(!store.is_dirty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn watch_stops_on_cancellation() -> Result<()> {
        let mut backend = MockStoreBackend::new();
        backend.expect_load().returning(|| Ok(Snapshot::new()));
        backend.expect_save().returning(|_| Ok(()));

        let token = CancellationToken::new();
        token.cancel();

        let store = run_watch(
            &backend,
            &Settings::default(),
            &FixedClock(noon()),
            token,
        )
        .await?;
        // Cancelled before the first tick; nothing was materialized.
        assert!(store.is_empty());
        Ok(())
    }
}
