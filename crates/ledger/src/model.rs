use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// Identity + provenance
// ---------------------------------------------------------------------------

/// Identifier attached to a candidate order.
///
/// Only `Upstream` identifiers are trustworthy. A `Synthesized` token is
/// scoped to the normalization call that minted it and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderId {
    /// Supplied by the upstream payload (`id` / `order_id`).
    Upstream(String),
    /// Random placeholder minted when the payload had no identifier.
    Synthesized(String),
    /// No identifier at all (manual entry).
    Absent,
}

impl OrderId {
    pub fn synthesize() -> Self {
        Self::Synthesized(Uuid::new_v4().to_string())
    }

    /// The identifier if it can be used as a dedup key.
    pub fn trusted(&self) -> Option<&str> {
        match self {
            Self::Upstream(id) => Some(id),
            Self::Synthesized(_) | Self::Absent => None,
        }
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upstream(id) => write!(f, "{id}"),
            Self::Synthesized(token) => write!(f, "~{token}"),
            Self::Absent => write!(f, "-"),
        }
    }
}

/// How an order was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Network,
    Scrape,
    Manual,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Scrape => write!(f, "scrape"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// Largest single amount the ledger accepts. Sums over any realistic ledger
/// stay far inside `Decimal`'s range.
pub fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000_i64)
}

/// A canonical order produced by the normalizer (or a manual entry).
/// `amount` is always strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateOrder {
    pub id: OrderId,
    pub occurred_at: DateTime<Utc>,
    pub amount: Decimal,
    pub label: String,
    pub provenance: Provenance,
}

impl CandidateOrder {
    pub fn occurred_on(&self) -> NaiveDate {
        self.occurred_at.date_naive()
    }
}

/// A user-typed order: name, price, date.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub label: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl ManualEntry {
    pub fn into_candidate(self) -> Result<CandidateOrder, LedgerError> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(LedgerError::InvalidManualEntry("label is empty".into()));
        }
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidManualEntry(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        if self.amount > max_amount() {
            return Err(LedgerError::InvalidManualEntry(format!(
                "amount {} exceeds the maximum of {}",
                self.amount,
                max_amount()
            )));
        }
        Ok(CandidateOrder {
            id: OrderId::Absent,
            occurred_at: self.date.and_time(chrono::NaiveTime::MIN).and_utc(),
            amount: self.amount,
            label: label.to_string(),
            provenance: Provenance::Manual,
        })
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// An admitted order. Created once on admission and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub seq: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub amount: Decimal,
    pub label: String,
    pub provenance: Provenance,
}

impl LedgerEntry {
    pub fn occurred_on(&self) -> NaiveDate {
        self.occurred_at.date_naive()
    }

    /// `YYYY-MM` bucket of `occurred_at` (UTC).
    pub fn month_key(&self) -> String {
        self.occurred_at.format("%Y-%m").to_string()
    }
}

pub const LEDGER_FORMAT_VERSION: u32 = 1;

/// The ordered sequence of admitted entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub version: u32,
    #[serde(default)]
    entries: Vec<LedgerEntry>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            version: LEDGER_FORMAT_VERSION,
            entries: Vec::new(),
        }
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next sequence number to hand out. Sequence numbers start at 1.
    pub fn next_seq(&self) -> u64 {
        self.entries.iter().map(|e| e.seq).max().unwrap_or(0) + 1
    }

    /// Append a candidate as entry `seq`. Synthesized identifiers are dropped.
    pub(crate) fn append(&mut self, seq: u64, candidate: &CandidateOrder) -> &LedgerEntry {
        self.entries.push(LedgerEntry {
            seq,
            external_id: candidate.id.trusted().map(str::to_string),
            occurred_at: candidate.occurred_at,
            amount: candidate.amount,
            label: candidate.label.clone(),
            provenance: candidate.provenance,
        });
        &self.entries[self.entries.len() - 1]
    }
}

impl FromIterator<LedgerEntry> for Ledger {
    fn from_iter<I: IntoIterator<Item = LedgerEntry>>(iter: I) -> Self {
        Self {
            version: LEDGER_FORMAT_VERSION,
            entries: iter.into_iter().collect(),
        }
    }
}
