use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use spendtrack_ledger::model::{CandidateOrder, Ledger, OrderId, Provenance};
use spendtrack_ledger::{admit, monthly, recent, total, ManualEntry, Normalizer, ScrapeOutcome};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-02-10T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Comparable view of a candidate: synthesized tokens differ per call.
fn canonical(c: &CandidateOrder) -> (Option<String>, Decimal, DateTime<Utc>) {
    (c.id.trusted().map(str::to_string), c.amount.normalize(), c.occurred_at)
}

// -------------------------------------------------------------------------
// Shape normalizer
// -------------------------------------------------------------------------

#[test]
fn all_shapes_extract_the_same_orders() {
    let normalizer = Normalizer::default();
    let shapes = ["list.json", "results.json", "data_orders.json", "store_orders.json"];

    let outputs: Vec<Vec<_>> = shapes
        .iter()
        .map(|name| {
            let raw: Value = serde_json::from_str(&fixture(name)).unwrap();
            normalizer.normalize_at(&raw, now()).iter().map(canonical).collect()
        })
        .collect();

    for (name, out) in shapes.iter().zip(&outputs) {
        assert_eq!(out, &outputs[0], "{name} disagrees with list.json");
    }

    // Refunded (-220) and cancelled (0) orders are filtered.
    let ids: Vec<Option<String>> = outputs[0].iter().map(|c| c.0.clone()).collect();
    assert_eq!(
        ids,
        vec![Some("ZP-1001".into()), Some("1002".into()), Some("ZP-1003".into())]
    );
    let amounts: Vec<Decimal> = outputs[0].iter().map(|c| c.1).collect();
    assert_eq!(amounts, vec![dec!(412.5), dec!(189), dec!(75)]);
}

#[test]
fn network_pipeline_end_to_end() {
    let normalizer = Normalizer::default();
    let raw: Value = serde_json::from_str(&fixture("results.json")).unwrap();
    let batch = normalizer.normalize_at(&raw, now());

    let first = admit(&batch, &Ledger::new());
    assert_eq!(first.admitted, 3);
    assert_eq!(total(&first.ledger), dec!(676.5));

    // The same capture arriving again through a different response shape.
    let raw: Value = serde_json::from_str(&fixture("store_orders.json")).unwrap();
    let replay = admit(&normalizer.normalize_at(&raw, now()), &first.ledger);
    assert_eq!(replay.admitted, 0);
    assert_eq!(replay.ledger, first.ledger);

    let newest: Vec<u64> = recent(&replay.ledger).iter().map(|e| e.seq).collect();
    assert_eq!(newest, vec![3, 2, 1]);

    let months: Vec<(String, Decimal)> = monthly(&replay.ledger)
        .into_iter()
        .map(|m| (m.month, m.total))
        .collect();
    assert_eq!(
        months,
        vec![("2026-02".into(), dec!(75)), ("2026-01".into(), dec!(601.5))]
    );
}

#[test]
fn admitting_same_id_twice_keeps_one_entry() {
    let normalizer = Normalizer::default();
    let raw = json!([{"id": "A1", "amount": 100, "order_date": "2026-01-01"}]);

    let first = admit(&normalizer.normalize_at(&raw, now()), &Ledger::new());
    let second = admit(&normalizer.normalize_at(&raw, now()), &first.ledger);

    assert_eq!(second.ledger.len(), 1);
    assert_eq!(second.ledger.entries()[0].external_id.as_deref(), Some("A1"));
}

#[test]
fn payloads_without_ids_dedup_on_date_and_amount() {
    let normalizer = Normalizer::default();
    let raw = json!({"results": [
        {"amount": 150, "created_at": "2026-01-08T08:00:00Z"},
        {"amount": 60,  "created_at": "2026-01-08T09:00:00Z"}
    ]});

    let first = admit(&normalizer.normalize_at(&raw, now()), &Ledger::new());
    let second = admit(&normalizer.normalize_at(&raw, now()), &first.ledger);

    assert_eq!(first.admitted, 2);
    assert_eq!(second.admitted, 0);
    assert!(second.ledger.entries().iter().all(|e| e.external_id.is_none()));
}

// -------------------------------------------------------------------------
// Text scrape
// -------------------------------------------------------------------------

#[test]
fn listing_page_fixture() {
    let outcome = Normalizer::default().normalize_text_at(&fixture("listing_page.txt"), now());
    assert_eq!(outcome.kind(), "listing");

    let admission = admit(&outcome.into_candidates(), &Ledger::new());
    assert_eq!(admission.admitted, 4);
    assert_eq!(total(&admission.ledger), dec!(813));
    assert!(admission
        .ledger
        .entries()
        .iter()
        .all(|e| e.provenance == Provenance::Scrape && e.external_id.is_none()));
}

#[test]
fn receipt_page_fixture_rescanned() {
    let normalizer = Normalizer::default();
    let text = fixture("receipt_page.txt");

    let outcome = normalizer.normalize_text_at(&text, now());
    let ScrapeOutcome::Detail(ref candidate) = outcome else {
        panic!("expected detail, got {outcome:?}");
    };
    assert_eq!(candidate.amount, dec!(220));

    // Scanning the same receipt again the same day adds nothing.
    let first = admit(&outcome.into_candidates(), &Ledger::new());
    let again = admit(&normalizer.normalize_text_at(&text, now()).into_candidates(), &first.ledger);
    assert_eq!(again.admitted, 0);
}

// -------------------------------------------------------------------------
// Manual entry
// -------------------------------------------------------------------------

#[test]
fn manual_entries_dedup_on_date_and_amount() {
    let entry = || ManualEntry {
        label: "Pharmacy".into(),
        amount: dec!(310),
        date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
    };
    let first = admit(&[entry().into_candidate().unwrap()], &Ledger::new());
    let second = admit(&[entry().into_candidate().unwrap()], &first.ledger);
    assert_eq!(second.ledger.len(), 1);
    assert_eq!(second.ledger.entries()[0].label, "Pharmacy");
    assert_eq!(second.ledger.entries()[0].provenance, Provenance::Manual);
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

fn arb_candidate() -> impl Strategy<Value = CandidateOrder> {
    (
        prop_oneof![
            (0u8..6).prop_map(|n| OrderId::Upstream(format!("O{n}"))),
            Just(OrderId::Absent),
            Just(OrderId::Synthesized(String::new())),
        ],
        1i64..50_000,
        0i64..90,
    )
        .prop_map(|(id, cents, day)| {
            let id = match id {
                OrderId::Synthesized(_) => OrderId::synthesize(),
                other => other,
            };
            CandidateOrder {
                id,
                occurred_at: now() - chrono::Duration::days(day),
                amount: Decimal::new(cents, 2),
                label: "Order".into(),
                provenance: Provenance::Network,
            }
        })
}

proptest! {
    #[test]
    fn admit_is_idempotent(
        seed in proptest::collection::vec(arb_candidate(), 0..12),
        batch in proptest::collection::vec(arb_candidate(), 0..12),
    ) {
        let base = admit(&seed, &Ledger::new()).ledger;
        let once = admit(&batch, &base);
        let twice = admit(&batch, &once.ledger);
        prop_assert_eq!(twice.admitted, 0);
        prop_assert_eq!(&twice.ledger, &once.ledger);
    }

    #[test]
    fn monthly_totals_sum_to_total(batch in proptest::collection::vec(arb_candidate(), 0..24)) {
        let ledger = admit(&batch, &Ledger::new()).ledger;
        let sum: Decimal = monthly(&ledger).iter().map(|m| m.total).sum();
        prop_assert_eq!(sum, total(&ledger));
    }

    #[test]
    fn sequence_numbers_strictly_increase(batch in proptest::collection::vec(arb_candidate(), 0..24)) {
        let ledger = admit(&batch, &Ledger::new()).ledger;
        let seqs: Vec<u64> = ledger.entries().iter().map(|e| e.seq).collect();
        prop_assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    }
}
