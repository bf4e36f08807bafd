//! Captured network responses: URL filter and body decoding.

use serde_json::Value;

use crate::model::CandidateOrder;
use crate::normalize::Normalizer;

impl Normalizer {
    /// Whether a captured response URL looks like an order-history endpoint.
    pub fn is_order_endpoint(&self, url: &str) -> bool {
        self.capture.is_match(url)
    }

    /// Normalize a captured response. Responses from unrelated endpoints and
    /// bodies that are not JSON produce no candidates.
    pub fn normalize_response(&self, url: &str, body: &str) -> Vec<CandidateOrder> {
        if !self.is_order_endpoint(url) {
            log::debug!("ignoring response from {url}");
            return Vec::new();
        }
        match decode_body(body) {
            Some(raw) => self.normalize(&raw),
            None => {
                log::debug!("ignoring non-JSON response from {url}");
                Vec::new()
            }
        }
    }
}

/// Parse a response body as JSON, `None` when it is not JSON.
pub fn decode_body(body: &str) -> Option<Value> {
    serde_json::from_str(body).ok()
}
