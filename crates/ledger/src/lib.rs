//! `spendtrack-ledger`: order normalization, ledger admission and spend reports.
//!
//! Pure engine crate: receives captured payloads or page text, returns
//! canonical orders, merged ledgers and derived views. No storage or CLI
//! dependencies.

pub mod capture;
pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod report;
pub mod scrape;

pub use config::NormalizerConfig;
pub use error::LedgerError;
pub use merge::{admit, Admission};
pub use model::{CandidateOrder, Ledger, LedgerEntry, ManualEntry, OrderId, Provenance};
pub use normalize::Normalizer;
pub use report::{monthly, recent, summarize, top_n, total, LedgerSummary, MonthTotal};
pub use scrape::ScrapeOutcome;
