mod json_store;
mod memory_store;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use json_store::JsonFileStore;
use memory_store::MemoryStore;

use crate::model::warnings::Ledger;

#[derive(Clone, Debug)]
enum StoreBackend {
    JsonFile(JsonFileStore),
    Memory(MemoryStore),
}

/// Persistence for the warning ledger. Every save replaces the full snapshot.
#[derive(Clone, Debug)]
pub struct LedgerStore {
    backend: StoreBackend,
    writes: Arc<AtomicU64>,
}

impl LedgerStore {
    /// Persist to a pretty-printed JSON file at `path`.
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self::from_backend(StoreBackend::JsonFile(JsonFileStore::new(path.into())))
    }

    /// Keep snapshots in memory only. Clones share the same snapshot.
    pub fn in_memory() -> Self {
        Self::from_backend(StoreBackend::Memory(MemoryStore::default()))
    }

    fn from_backend(backend: StoreBackend) -> Self {
        Self {
            backend,
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Human readable location of the snapshot, for logs.
    pub fn describe(&self) -> String {
        match &self.backend {
            StoreBackend::JsonFile(store) => store.path().display().to_string(),
            StoreBackend::Memory(_) => "memory".to_owned(),
        }
    }

    /// Load the last saved snapshot. `Ok(None)` means nothing was ever saved.
    pub async fn load(&self) -> anyhow::Result<Option<Ledger>> {
        match &self.backend {
            StoreBackend::JsonFile(store) => store.load().await,
            StoreBackend::Memory(store) => Ok(store.load()),
        }
    }

    pub async fn save(&self, ledger: &Ledger) -> anyhow::Result<()> {
        match &self.backend {
            StoreBackend::JsonFile(store) => store.save(ledger).await?,
            StoreBackend::Memory(store) => store.save(ledger),
        }

        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Move an unusable snapshot out of the way so the next save cannot clobber it.
    ///
    /// Returns the new location, or `None` when there was nothing to move.
    pub async fn quarantine(&self) -> anyhow::Result<Option<String>> {
        match &self.backend {
            StoreBackend::JsonFile(store) => Ok(store
                .quarantine()
                .await?
                .map(|path| path.display().to_string())),
            StoreBackend::Memory(_) => Ok(None),
        }
    }

    /// Number of successful saves through this store (shared across clones).
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}
