//! Shape normalizer: captured JSON payloads → canonical candidate orders.
//!
//! Upstream responses come in a handful of layouts. Each layout is a
//! [`PayloadShape`] variant; detection walks the variants in priority order
//! and the first one that yields an item array wins. New layouts are added as
//! new variants, never as ad hoc probing at call sites.
//!
//! Per-item fields are resolved through ordered fallback chains. Nothing in
//! here fails: a payload that matches no shape, or items that carry no usable
//! amount, simply produce fewer candidates.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::config::NormalizerConfig;
use crate::error::LedgerError;
use crate::model::{max_amount, CandidateOrder, OrderId, Provenance};

const AMOUNT_FIELDS: &[&str] = &[
    "grand_total",
    "total_amount",
    "payable_amount",
    "amount",
    "final_amount",
];
const TIMESTAMP_FIELDS: &[&str] = &["order_date", "created_at", "delivery_date"];
const ID_FIELDS: &[&str] = &["id", "order_id"];

/// Epoch values at or above this are milliseconds, below are seconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// Known layouts of an order-history response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `[ {...}, {...} ]`
    List,
    /// `{ "results": [...] }`
    Results,
    /// `{ "data": { "orders": [...] } }`
    DataOrders,
    /// `{ "store_orders": [...] }`
    StoreOrders,
}

impl PayloadShape {
    /// Detection priority.
    pub const PRIORITY: [PayloadShape; 4] = [
        PayloadShape::List,
        PayloadShape::Results,
        PayloadShape::DataOrders,
        PayloadShape::StoreOrders,
    ];

    pub fn detect(raw: &Value) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|shape| shape.items(raw).is_some())
    }

    /// The item array this shape reads, if `raw` has that layout.
    pub fn items(self, raw: &Value) -> Option<&Vec<Value>> {
        match self {
            Self::List => raw.as_array(),
            Self::Results => raw.get("results")?.as_array(),
            Self::DataOrders => raw.get("data")?.get("orders")?.as_array(),
            Self::StoreOrders => raw.get("store_orders")?.as_array(),
        }
    }
}

impl std::fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Results => write!(f, "results"),
            Self::DataOrders => write!(f, "data.orders"),
            Self::StoreOrders => write!(f, "store_orders"),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Compiled normalizer profile.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
    pub(crate) capture: Regex,
    pub(crate) token: Regex,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default()).expect("built-in normalizer profile is valid")
    }
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let capture = config.capture_regex()?;
        let token = config.token_regex()?;
        Ok(Self {
            config,
            capture,
            token,
        })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a captured payload, defaulting missing timestamps to now.
    pub fn normalize(&self, raw: &Value) -> Vec<CandidateOrder> {
        self.normalize_at(raw, Utc::now())
    }

    /// Normalize a captured payload with an explicit invocation time.
    pub fn normalize_at(&self, raw: &Value, now: DateTime<Utc>) -> Vec<CandidateOrder> {
        let Some(shape) = PayloadShape::detect(raw) else {
            log::debug!("payload matched no known order shape");
            return Vec::new();
        };
        let items = shape.items(raw).map(Vec::as_slice).unwrap_or(&[]);

        let candidates: Vec<CandidateOrder> = items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|item| self.candidate_from_item(item, now))
            .collect();

        log::debug!(
            "{shape} payload: {} item(s) → {} candidate(s)",
            items.len(),
            candidates.len()
        );
        candidates
    }

    fn candidate_from_item(
        &self,
        item: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Option<CandidateOrder> {
        let amount = first_amount(item).unwrap_or(Decimal::ZERO);
        if amount <= Decimal::ZERO {
            return None;
        }
        if amount > max_amount() {
            log::warn!("dropping order with out-of-range amount {amount}");
            return None;
        }

        Some(CandidateOrder {
            id: first_id(item).unwrap_or_else(OrderId::synthesize),
            occurred_at: first_timestamp(item).unwrap_or(now),
            amount,
            label: self.config.label.clone(),
            provenance: Provenance::Network,
        })
    }
}

// ---------------------------------------------------------------------------
// Fallback chains
// ---------------------------------------------------------------------------

/// First non-zero amount in `AMOUNT_FIELDS` order. Negative values win too and
/// are dropped by the caller.
fn first_amount(item: &Map<String, Value>) -> Option<Decimal> {
    AMOUNT_FIELDS
        .iter()
        .filter_map(|field| item.get(*field))
        .filter_map(parse_amount)
        .find(|amount| !amount.is_zero())
}

fn first_timestamp(item: &Map<String, Value>) -> Option<DateTime<Utc>> {
    TIMESTAMP_FIELDS
        .iter()
        .filter_map(|field| item.get(*field))
        .find_map(parse_timestamp)
}

fn first_id(item: &Map<String, Value>) -> Option<OrderId> {
    ID_FIELDS
        .iter()
        .filter_map(|field| item.get(*field))
        .find_map(parse_id)
}

pub(crate) fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Some(Decimal::from(u));
            }
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => parse_amount_text(s),
        _ => None,
    }
}

/// Lenient numeric parse: tolerates a leading sign, a currency prefix and
/// comma grouping, and ignores trailing text ("249.00 INR").
pub(crate) fn parse_amount_text(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let (prefix, rest) = text.split_at(start);
    let negative = prefix.matches('-').count() % 2 == 1;
    // ".5" and "₹.5" start with a decimal point; the dot in "Rs.249" does not.
    let leading_point = prefix
        .strip_suffix('.')
        .is_some_and(|p| !p.ends_with(|c: char| c.is_alphabetic()));

    let mut numeric = String::from(if leading_point { "0." } else { "" });
    numeric.extend(
        rest.chars()
            .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
            .filter(|c| *c != ','),
    );
    let value = Decimal::from_str(&numeric).ok()?;
    Some(if negative { -value } else { value })
}

pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(from_epoch),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            let parsed = parse_timestamp_text(s);
            if parsed.is_none() {
                log::warn!("unparseable order timestamp '{s}'");
            }
            parsed
        }
        _ => None,
    }
}

fn parse_timestamp_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok().and_then(from_epoch);
    }
    None
}

fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    match value {
        v if v <= 0 => None,
        v if v >= EPOCH_MILLIS_THRESHOLD => DateTime::from_timestamp_millis(v),
        v => DateTime::from_timestamp(v, 0),
    }
}

fn parse_id(value: &Value) -> Option<OrderId> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(OrderId::Upstream(s.trim().to_string())),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(OrderId::Upstream(n.to_string())),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
