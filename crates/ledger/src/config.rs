use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// Normalizer profile
// ---------------------------------------------------------------------------

/// Site profile for the normalizer. Every field has a built-in default, so an
/// empty TOML document is a valid profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Constant label given to every network/scrape order.
    pub label: String,
    /// Case-insensitive pattern a captured URL must match to count as an
    /// order response.
    pub capture_pattern: String,
    /// A page with more tokens than this is classified as a listing page.
    pub listing_min_tokens: usize,
    /// On listing pages, tokens at or below this value are decorative.
    pub listing_min_amount: Decimal,
    /// Symbols that introduce a currency token in scraped text.
    pub currency_symbols: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            label: "Order".into(),
            capture_pattern: "orders|history".into(),
            listing_min_tokens: 3,
            listing_min_amount: Decimal::TEN,
            currency_symbols: vec![
                "₹".into(),
                "Rs.".into(),
                "Rs".into(),
                "INR".into(),
                "$".into(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl NormalizerConfig {
    pub fn from_toml(input: &str) -> Result<Self, LedgerError> {
        let config: NormalizerConfig =
            toml::from_str(input).map_err(|e| LedgerError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.label.trim().is_empty() {
            return Err(LedgerError::ConfigValidation("label must not be empty".into()));
        }

        if self.listing_min_amount < Decimal::ZERO {
            return Err(LedgerError::ConfigValidation(format!(
                "listing_min_amount must not be negative, got {}",
                self.listing_min_amount
            )));
        }

        if self.currency_symbols.is_empty() {
            return Err(LedgerError::ConfigValidation(
                "at least one currency symbol is required".into(),
            ));
        }
        if let Some(i) = self.currency_symbols.iter().position(|s| s.trim().is_empty()) {
            return Err(LedgerError::ConfigValidation(format!(
                "currency_symbols[{i}] is empty"
            )));
        }

        self.capture_regex()?;
        Ok(())
    }

    pub(crate) fn capture_regex(&self) -> Result<Regex, LedgerError> {
        Regex::new(&format!("(?i){}", self.capture_pattern)).map_err(|e| {
            LedgerError::ConfigValidation(format!(
                "capture_pattern '{}': {e}",
                self.capture_pattern
            ))
        })
    }

    /// Currency token pattern: symbol, optional space, digits with optional
    /// comma grouping, optional fraction. Group 1 is the numeric part.
    pub(crate) fn token_regex(&self) -> Result<Regex, LedgerError> {
        let mut symbols: Vec<&str> = self.currency_symbols.iter().map(|s| s.trim()).collect();
        // Longest first so "Rs." wins over "Rs".
        symbols.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = symbols
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?:{alternation})\s?(\d+(?:,\d+)*(?:\.\d+)?)"))
            .map_err(|e| LedgerError::ConfigValidation(format!("currency_symbols: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
