//! Serialized admission on top of a [`LedgerStore`].
//!
//! Observations may arrive back to back. Each mutation holds the tracker's
//! lock across the whole load → modify → save cycle, so two admissions can
//! never read the same ledger and overwrite each other's entries. Nothing is
//! cached between calls: every operation starts from the stored ledger and
//! hands the caller the ledger it just wrote.

use parking_lot::Mutex;
use serde_json::Value;
use spendtrack_ledger::{admit, CandidateOrder, Ledger, LedgerError, ManualEntry, Normalizer};

use crate::error::StoreError;
use crate::LedgerStore;

/// Outcome of one admission.
#[derive(Debug, Clone)]
pub struct AdmitReport {
    /// Candidates offered to the merger.
    pub candidates: usize,
    /// Candidates that became new entries.
    pub admitted: usize,
    /// The ledger as stored after this admission.
    pub ledger: Ledger,
}

pub struct Tracker<S> {
    store: S,
    normalizer: Normalizer,
    gate: Mutex<()>,
}

impl<S: LedgerStore> Tracker<S> {
    pub fn new(store: S, normalizer: Normalizer) -> Self {
        Self {
            store,
            normalizer,
            gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fresh copy of the stored ledger.
    pub fn snapshot(&self) -> Result<Ledger, StoreError> {
        let _guard = self.gate.lock();
        self.store.load()
    }

    /// Admit already-normalized candidates.
    ///
    /// On a failed save the stored ledger is unchanged and the error is
    /// returned; nothing is partially admitted.
    pub fn admit(&self, candidates: &[CandidateOrder]) -> Result<AdmitReport, StoreError> {
        let _guard = self.gate.lock();

        let current = self.store.load()?;
        let admission = admit(candidates, &current);

        if admission.admitted > 0 {
            self.store.save(&admission.ledger)?;
            log::info!("saved {} new order(s)", admission.admitted);
        } else {
            log::debug!("no new orders in batch of {}", candidates.len());
        }

        Ok(AdmitReport {
            candidates: candidates.len(),
            admitted: admission.admitted,
            ledger: admission.ledger,
        })
    }

    /// Admit orders from a captured JSON payload.
    pub fn ingest_payload(&self, raw: &Value) -> Result<AdmitReport, StoreError> {
        let candidates = self.normalizer.normalize(raw);
        self.admit(&candidates)
    }

    /// Admit orders from a captured response, applying the endpoint filter.
    pub fn ingest_response(&self, url: &str, body: &str) -> Result<AdmitReport, StoreError> {
        let candidates = self.normalizer.normalize_response(url, body);
        self.admit(&candidates)
    }

    /// Admit orders scraped from page text.
    pub fn ingest_text(&self, text: &str) -> Result<AdmitReport, StoreError> {
        let outcome = self.normalizer.normalize_text(text);
        log::debug!("page classified as {}", outcome.kind());
        self.admit(&outcome.into_candidates())
    }

    /// Admit one manual entry, bypassing the normalizer.
    pub fn add_manual(&self, entry: ManualEntry) -> Result<AdmitReport, TrackerError> {
        let candidate = entry.into_candidate().map_err(TrackerError::Ledger)?;
        self.admit(&[candidate]).map_err(TrackerError::Store)
    }

    /// Drop every entry. Returns the empty ledger now in the store.
    pub fn clear(&self) -> Result<Ledger, StoreError> {
        let _guard = self.gate.lock();
        self.store.clear()?;
        log::info!("ledger cleared");
        Ok(Ledger::new())
    }
}

/// Failure of an operation that validates input before touching the store.
#[derive(Debug)]
pub enum TrackerError {
    Ledger(LedgerError),
    Store(StoreError),
}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ledger(e) => write!(f, "{e}"),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TrackerError {}
