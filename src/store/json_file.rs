use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

use super::day_store::{DayStore, Snapshot};

/// Load-at-startup / save-after-mutation contract of the persistence
/// collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Returns the prior mapping, or an empty one when nothing was saved yet.
    async fn load(&self) -> Result<Snapshot>;

    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

const STORE_FILE: &str = "days.json";

/// Keeps the whole day mapping as one JSON document in the application
/// directory, next to the settings.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: &Path) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(dir)?;

        Ok(Self {
            path: dir.join(STORE_FILE),
        })
    }
}

#[async_trait]
impl StoreBackend for JsonFileBackend {
    async fn load(&self) -> Result<Snapshot> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Snapshot::new()),
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;
        let mut text = String::new();
        let read = file.read_to_string(&mut text).await;
        file.unlock_async().await?;
        read?;

        serde_json::from_str(&text)
            .with_context(|| format!("Corrupted store file {:?}", self.path))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        debug!("saving {} days to {:?}", snapshot.len(), self.path);
        let tmp = self.path.with_extension("json.tmp");
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp)
            .await?;
        // Semi-safe acquire-release for the temp file; the final rename keeps
        // the store whole across interrupted writes.
        file.lock_exclusive()?;
        let buffer = serde_json::to_vec_pretty(snapshot)?;
        let write = async {
            file.write_all(&buffer).await?;
            file.flush().await
        }
        .await;
        file.unlock_async().await?;
        write?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Saves and clears the dirty flag when the store has pending changes.
pub async fn persist_if_dirty(backend: &impl StoreBackend, store: &mut DayStore) -> Result<()> {
    if store.is_dirty() {
        backend.save(store.snapshot()).await?;
        store.mark_clean();
    }
    Ok(())
}
