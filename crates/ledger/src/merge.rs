//! Ledger admission.
//!
//! Two records are the same order when both carry a trustworthy (upstream)
//! identifier and those identifiers are equal, or when neither carries one and
//! they agree on amount and calendar date. A record with a trustworthy id is
//! never matched against one without. Synthesized ids are never compared.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::model::{CandidateOrder, Ledger, LedgerEntry};

/// Result of admitting a batch: the new ledger and how many entries it gained.
#[derive(Debug, Clone)]
pub struct Admission {
    pub ledger: Ledger,
    pub admitted: usize,
}

/// Dedup key for one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    Id(String),
    DateAmount(NaiveDate, Decimal),
}

impl DedupKey {
    fn of_candidate(candidate: &CandidateOrder) -> Self {
        match candidate.id.trusted() {
            Some(id) => Self::Id(id.to_string()),
            None => Self::DateAmount(candidate.occurred_on(), candidate.amount.normalize()),
        }
    }

    fn of_entry(entry: &LedgerEntry) -> Self {
        match &entry.external_id {
            Some(id) => Self::Id(id.clone()),
            None => Self::DateAmount(entry.occurred_on(), entry.amount.normalize()),
        }
    }
}

/// Append every candidate that is not already in `ledger`, in input order.
///
/// `ledger` itself is left untouched; the caller persists the returned ledger
/// and keeps the old one if that fails. Matching candidates are dropped, not
/// merged: the first-seen record wins.
pub fn admit(candidates: &[CandidateOrder], ledger: &Ledger) -> Admission {
    let mut seen: HashSet<DedupKey> = ledger.entries().iter().map(DedupKey::of_entry).collect();
    let mut next = ledger.clone();
    let mut seq = ledger.next_seq();
    let mut admitted = 0;

    for candidate in candidates {
        if seen.insert(DedupKey::of_candidate(candidate)) {
            let entry = next.append(seq, candidate);
            seq += 1;
            log::debug!(
                "admitted #{} {} {} ({})",
                entry.seq,
                entry.occurred_on(),
                entry.amount,
                entry.provenance
            );
            admitted += 1;
        }
    }

    Admission {
        ledger: next,
        admitted,
    }
}
