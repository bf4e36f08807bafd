// Application settings
// Loaded from ~/.config/spendtrack/settings.json

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Storage
    #[serde(rename = "storage.ledgerPath")]
    pub ledger_path: Option<PathBuf>,  // None = platform data dir

    // Normalizer
    #[serde(rename = "normalizer.profile")]
    pub profile: Option<PathBuf>,  // TOML site profile, None = built-in

    // Reports
    #[serde(rename = "report.topN")]
    pub top_n: usize,

    #[serde(rename = "report.recentLimit")]
    pub recent_limit: Option<usize>,

    // Display
    #[serde(rename = "display.currencySymbol")]
    pub currency_symbol: String,

    #[serde(rename = "display.dateFormat")]
    pub date_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Storage
            ledger_path: None,
            // Normalizer
            profile: None,
            // Reports
            top_n: 5,
            recent_limit: None,
            // Display
            currency_symbol: "₹".into(),
            date_format: "%d/%m/%Y".into(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spendtrack");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults.
    /// Writes a commented default file on first run.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings.sanitized(),
                Err(e) => {
                    log::warn!("error parsing {}: {e}; using default settings", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {e}; using default settings", path.display());
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Replace values that would fail at render time with their defaults.
    fn sanitized(mut self) -> Self {
        if !is_valid_date_format(&self.date_format) {
            log::warn!(
                "invalid display.dateFormat '{}'; using default",
                self.date_format
            );
            self.date_format = Self::default().date_format;
        }
        self
    }

    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("error creating config directory: {e}");
                return;
            }
        }

        let default_config = r#"{
    // Where the ledger lives (null = platform data directory)
    "storage.ledgerPath": null,

    // TOML site profile for the normalizer (null = built-in profile)
    "normalizer.profile": null,

    // Reports
    "report.topN": 5,
    "report.recentLimit": null,

    // Display
    "display.currencySymbol": "₹",
    "display.dateFormat": "%d/%m/%Y"
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            log::warn!("error writing default settings.json: {e}");
        }
    }
}

/// Whether chrono can render `fmt` (no unknown `%` specifiers).
pub fn is_valid_date_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}
