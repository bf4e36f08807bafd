//! Text-scrape normalizer: rendered page text → candidate orders.
//!
//! Best-effort and layout-dependent. A page with many currency figures is
//! read as an order listing; a page with few is read as a receipt whose
//! largest figure is the grand total. Every candidate produced here carries
//! [`Provenance::Scrape`] so callers can weigh it below network captures.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::model::{max_amount, CandidateOrder, OrderId, Provenance};
use crate::normalize::Normalizer;

/// How a scanned page was classified.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    /// Order-history page: one candidate per non-decorative figure.
    Listing(Vec<CandidateOrder>),
    /// Receipt-style page: the largest figure is the order total.
    Detail(CandidateOrder),
    /// No currency figures found.
    Nothing,
}

impl ScrapeOutcome {
    pub fn into_candidates(self) -> Vec<CandidateOrder> {
        match self {
            Self::Listing(candidates) => candidates,
            Self::Detail(candidate) => vec![candidate],
            Self::Nothing => Vec::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Listing(_) => "listing",
            Self::Detail(_) => "detail",
            Self::Nothing => "nothing",
        }
    }
}

impl Normalizer {
    /// Every currency figure in `text`, in order of appearance. Figures above
    /// the ledger's amount cap are skipped.
    pub fn currency_tokens(&self, text: &str) -> Vec<Decimal> {
        self.token
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| Decimal::from_str(&m.as_str().replace(',', "")).ok())
            .filter(|amount| *amount <= max_amount())
            .collect()
    }

    /// Classify and extract orders from scraped page text, dated now.
    pub fn normalize_text(&self, text: &str) -> ScrapeOutcome {
        self.normalize_text_at(text, Utc::now())
    }

    pub fn normalize_text_at(&self, text: &str, now: DateTime<Utc>) -> ScrapeOutcome {
        let tokens = self.currency_tokens(text);
        let config = self.config();

        if tokens.len() > config.listing_min_tokens {
            let candidates: Vec<CandidateOrder> = tokens
                .iter()
                .filter(|amount| **amount > config.listing_min_amount)
                .map(|amount| self.scraped(*amount, now))
                .collect();
            log::debug!(
                "listing page: {} token(s), {} above {}",
                tokens.len(),
                candidates.len(),
                config.listing_min_amount
            );
            return ScrapeOutcome::Listing(candidates);
        }

        match tokens.iter().max() {
            Some(total) if *total > Decimal::ZERO => {
                log::debug!("detail page: {} token(s), total {total}", tokens.len());
                ScrapeOutcome::Detail(self.scraped(*total, now))
            }
            _ => {
                log::debug!("page text contained no usable currency figures");
                ScrapeOutcome::Nothing
            }
        }
    }

    fn scraped(&self, amount: Decimal, now: DateTime<Utc>) -> CandidateOrder {
        CandidateOrder {
            id: OrderId::synthesize(),
            occurred_at: now,
            amount,
            label: self.config().label.clone(),
            provenance: Provenance::Scrape,
        }
    }
}
