use parking_lot::Mutex;
use spendtrack_ledger::Ledger;

use crate::error::StoreError;
use crate::LedgerStore;

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Mutex<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Ledger, StoreError> {
        Ok(self.ledger.lock().clone())
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        *self.ledger.lock() = ledger.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.ledger.lock() = Ledger::new();
        Ok(())
    }
}
