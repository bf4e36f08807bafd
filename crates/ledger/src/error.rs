use std::fmt;

#[derive(Debug)]
pub enum LedgerError {
    /// TOML parse / deserialization error in a normalizer profile.
    ConfigParse(String),
    /// Profile validation error (bad pattern, empty symbol list, etc.).
    ConfigValidation(String),
    /// Manual entry rejected before reaching the merger.
    InvalidManualEntry(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "profile parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "profile validation error: {msg}"),
            Self::InvalidManualEntry(msg) => write!(f, "invalid manual entry: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}
