use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

use crate::model::warnings::Ledger;
use crate::store::LedgerStore;

/// Shared ledger handle passed across crates.
///
/// The in-memory ledger is the source of truth; the store mirrors it after every
/// mutation. The lock is held across the save so concurrent writers serialize.
#[derive(Clone, Debug)]
pub struct Database {
    ledger: Arc<Mutex<Ledger>>,
    store: LedgerStore,
}

impl Database {
    /// Load the ledger from `store`, starting empty if nothing usable is there.
    pub async fn open(store: LedgerStore) -> Self {
        let ledger = match store.load().await {
            Ok(Some(ledger)) => {
                info!(
                    members = ledger.len(),
                    location = %store.describe(),
                    "Warning ledger loaded."
                );
                ledger
            }
            Ok(None) => {
                info!(location = %store.describe(), "No warning ledger found; starting empty.");
                Ledger::new()
            }
            Err(source) => {
                warn!(
                    ?source,
                    location = %store.describe(),
                    "Failed to load warning ledger; starting empty."
                );
                match store.quarantine().await {
                    Ok(Some(moved_to)) => {
                        warn!(moved_to = %moved_to, "Unreadable warning ledger moved aside.");
                    }
                    Ok(None) => {}
                    Err(source) => {
                        error!(?source, "Failed to move unreadable warning ledger aside.");
                    }
                }
                Ledger::new()
            }
        };

        Self::with_ledger(ledger, store)
    }

    /// Create a handle around an already loaded ledger.
    pub fn with_ledger(ledger: Ledger, store: LedgerStore) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            store,
        }
    }

    /// Expose the store for query modules.
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().await
    }

    /// Copy of the current in-memory ledger.
    pub async fn snapshot(&self) -> Ledger {
        self.ledger.lock().await.clone()
    }
}
