//! Derived views over a ledger snapshot. Pure: nothing here mutates the
//! ledger, and the same ledger always produces the same output.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{Ledger, LedgerEntry};

/// Sum of one `YYYY-MM` bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: String,
    pub total: Decimal,
    pub count: usize,
}

/// Everything a presentation layer needs in one value.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub count: usize,
    pub total: Decimal,
    pub recent: Vec<LedgerEntry>,
    pub top: Vec<LedgerEntry>,
    pub monthly: Vec<MonthTotal>,
}

/// Overflow pins at `Decimal::MAX`. Only a hand-edited ledger file can get
/// there; admitted amounts are capped.
fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}

/// Sum of all amounts, unrounded.
pub fn total(ledger: &Ledger) -> Decimal {
    ledger
        .entries()
        .iter()
        .fold(Decimal::ZERO, |sum, e| add(sum, e.amount))
}

/// Most recent first; ties broken by the later sequence number.
pub fn recent(ledger: &Ledger) -> Vec<LedgerEntry> {
    let mut entries = ledger.entries().to_vec();
    entries.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| b.seq.cmp(&a.seq))
    });
    entries
}

/// Largest amounts first, at most `n`; equal amounts keep ledger order.
pub fn top_n(ledger: &Ledger, n: usize) -> Vec<LedgerEntry> {
    let mut entries = ledger.entries().to_vec();
    entries.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.seq.cmp(&b.seq)));
    entries.truncate(n);
    entries
}

/// Per-month totals, newest month first.
pub fn monthly(ledger: &Ledger) -> Vec<MonthTotal> {
    let mut groups: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();

    for entry in ledger.entries() {
        let slot = groups.entry(entry.month_key()).or_insert((Decimal::ZERO, 0));
        slot.0 = add(slot.0, entry.amount);
        slot.1 += 1;
    }

    groups
        .into_iter()
        .rev()
        .map(|(month, (total, count))| MonthTotal {
            month,
            total,
            count,
        })
        .collect()
}

pub fn summarize(ledger: &Ledger, top: usize) -> LedgerSummary {
    LedgerSummary {
        count: ledger.len(),
        total: total(ledger),
        recent: recent(ledger),
        top: top_n(ledger, top),
        monthly: monthly(ledger),
    }
}
