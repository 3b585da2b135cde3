use std::sync::{Arc, Mutex, PoisonError};

use crate::model::warnings::Ledger;

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    snapshot: Arc<Mutex<Option<Ledger>>>,
}

impl MemoryStore {
    pub fn load(&self) -> Option<Ledger> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn save(&self, ledger: &Ledger) {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(ledger.clone());
    }
}
