//! `spendtrack-store`: ledger persistence.
//!
//! The store is the only durable copy of the ledger. Every mutation goes
//! through [`Tracker`], which runs load → merge → save under one lock.

pub mod error;
pub mod json_file;
pub mod memory;
pub mod tracker;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use tracker::{AdmitReport, Tracker, TrackerError};

use spendtrack_ledger::Ledger;

/// Whole-ledger persistence backend.
pub trait LedgerStore {
    /// Current ledger. A store that was never written holds an empty ledger.
    fn load(&self) -> Result<Ledger, StoreError>;

    /// Replace the stored ledger. Readers see either the old or the new
    /// ledger, never a mix.
    fn save(&self, ledger: &Ledger) -> Result<(), StoreError>;

    /// Remove every entry.
    fn clear(&self) -> Result<(), StoreError>;
}
