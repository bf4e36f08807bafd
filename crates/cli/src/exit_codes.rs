//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                                  |
//! |---------|-----------|----------------------------------------------|
//! | 0       | Universal | Success                                      |
//! | 1       | Universal | General error (unspecified)                  |
//! | 2       | Universal | CLI usage error (bad args, missing file)     |
//! | 10-19   | input     | Observation / manual entry input problems    |
//! | 20-29   | store     | Ledger persistence failures                  |
//! | 30-39   | profile   | Normalizer profile problems                  |
//!
//! An observation that yields no orders is not an error: it exits 0.
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use spendtrack_store::StoreError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (10-19)
// =============================================================================

/// Input file or stdin could not be read.
pub const EXIT_INPUT_READ: u8 = 10;

/// `ingest` payload is not JSON.
pub const EXIT_INPUT_NOT_JSON: u8 = 11;

/// Manual entry rejected (non-positive amount, empty label, bad date).
pub const EXIT_MANUAL_INVALID: u8 = 12;

// =============================================================================
// Store (20-29)
// =============================================================================

/// Ledger file could not be read or written.
pub const EXIT_STORE_IO: u8 = 20;

/// Ledger file exists but cannot be decoded.
pub const EXIT_STORE_CORRUPT: u8 = 21;

/// Ledger could not be encoded for writing.
pub const EXIT_STORE_ENCODE: u8 = 22;

// =============================================================================
// Profile (30-39)
// =============================================================================

/// Profile file could not be read.
pub const EXIT_PROFILE_READ: u8 = 30;

/// Profile TOML is malformed or fails validation.
pub const EXIT_PROFILE_INVALID: u8 = 31;

/// Map a store error to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::Io { .. } | StoreError::Unavailable(_) => EXIT_STORE_IO,
        StoreError::Corrupt { .. } => EXIT_STORE_CORRUPT,
        StoreError::Serialize(_) => EXIT_STORE_ENCODE,
    }
}
