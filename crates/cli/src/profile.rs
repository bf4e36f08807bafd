// Normalizer profile loading and `profile validate`

use std::path::Path;

use spendtrack_ledger::{Normalizer, NormalizerConfig};

use crate::exit_codes::{EXIT_PROFILE_INVALID, EXIT_PROFILE_READ};
use crate::CliError;

pub fn load_profile(path: &Path) -> Result<NormalizerConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_PROFILE_READ, format!("{}: {}", path.display(), e))
    })?;
    NormalizerConfig::from_toml(&text).map_err(|e| {
        CliError::new(EXIT_PROFILE_INVALID, format!("{}: {}", path.display(), e))
    })
}

pub fn cmd_profile_validate(path: &Path) -> Result<(), CliError> {
    let config = load_profile(path)?;
    // Compiles the capture and token patterns.
    let normalizer = Normalizer::new(config)
        .map_err(|e| CliError::new(EXIT_PROFILE_INVALID, format!("{}: {}", path.display(), e)))?;

    let config = normalizer.config();
    println!("ok: {}", path.display());
    println!("  label:              {}", config.label);
    println!("  capture pattern:    {}", config.capture_pattern);
    println!("  listing min tokens: {}", config.listing_min_tokens);
    println!("  listing min amount: {}", config.listing_min_amount);
    println!("  currency symbols:   {}", config.currency_symbols.join(" "));
    Ok(())
}
