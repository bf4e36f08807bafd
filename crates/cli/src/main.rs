// spendtrack CLI - personal order spend ledger
// Feeds captured responses, scraped page text and manual entries into the
// ledger, and prints spend reports.

mod exit_codes;
mod ingest;
mod profile;
mod report;
mod util;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use spendtrack_config::Settings;
use spendtrack_ledger::{Normalizer, NormalizerConfig};
use spendtrack_store::{JsonFileStore, StoreError, Tracker};
use tracing_subscriber::EnvFilter;

use exit_codes::{store_exit_code, EXIT_ERROR, EXIT_INPUT_READ, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "spendtrack")]
#[command(about = "Personal spend ledger fed by captured order responses, page text and manual entries")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Ledger file (overrides storage.ledgerPath)
    #[arg(long, global = true, env = "SPENDTRACK_LEDGER")]
    ledger: Option<PathBuf>,

    /// Settings file (default: platform config dir)
    #[arg(long, global = true, env = "SPENDTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Normalizer profile TOML (overrides normalizer.profile)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Admit orders from a captured JSON response
    #[command(after_help = "\
Examples:
  spendtrack ingest orders.json
  spendtrack ingest response.json --url https://api.example.in/api/v2/order-history
  cat capture.json | spendtrack ingest -")]
    Ingest {
        /// Payload file (omit or '-' for stdin)
        input: Option<PathBuf>,

        /// URL the response was captured from; non-order endpoints are ignored
        #[arg(long)]
        url: Option<String>,

        /// Print the admission report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Admit orders scraped from rendered page text
    #[command(after_help = "\
Examples:
  spendtrack scan orders-page.txt
  xclip -o | spendtrack scan")]
    Scan {
        /// Text file (omit or '-' for stdin)
        input: Option<PathBuf>,

        /// Print the admission report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Record an order by hand
    #[command(after_help = "\
Examples:
  spendtrack add --amount 349.50 --label Groceries
  spendtrack add --amount 120 --label Pharmacy --date 2026-01-03")]
    Add {
        /// Order total
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// What was bought
        #[arg(long, default_value = "Manual entry")]
        label: String,

        /// Order date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Print the admission report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Total, order count, recent orders, top orders and monthly totals
    Summary {
        /// How many top orders to list (default: report.topN)
        #[arg(long)]
        top: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Orders, most recent first
    Recent {
        /// Show at most this many (default: report.recentLimit)
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Largest orders
    Top {
        /// How many to list (default: report.topN)
        #[arg(short = 'n', long)]
        n: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Spend per month, newest first
    Monthly {
        #[arg(long)]
        json: bool,
    },

    /// Total spend
    Total {
        #[arg(long)]
        json: bool,
    },

    /// Delete every tracked order
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Normalizer profile tools
    #[command(subcommand)]
    Profile(ProfileCommands),
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Validate a normalizer profile without touching the ledger
    Validate {
        /// Path to the profile TOML
        file: PathBuf,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nledger:  spendtrack-ledger ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nledger:  spendtrack-ledger ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging() {
    // Also captures `log` records from the library crates.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let ctx = Context::new(cli.config, cli.ledger, cli.profile);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: spendtrack <command> [options]");
            eprintln!("       spendtrack --help for more information");
            Ok(())
        }
        Some(Commands::Ingest { input, url, json }) => ingest::cmd_ingest(&ctx, input, url, json),
        Some(Commands::Scan { input, json }) => ingest::cmd_scan(&ctx, input, json),
        Some(Commands::Add { amount, label, date, json }) => {
            ingest::cmd_add(&ctx, &amount, label, date.as_deref(), json)
        }
        Some(Commands::Summary { top, json }) => report::cmd_summary(&ctx, top, json),
        Some(Commands::Recent { limit, json }) => report::cmd_recent(&ctx, limit, json),
        Some(Commands::Top { n, json }) => report::cmd_top(&ctx, n, json),
        Some(Commands::Monthly { json }) => report::cmd_monthly(&ctx, json),
        Some(Commands::Total { json }) => report::cmd_total(&ctx, json),
        Some(Commands::Clear { yes }) => report::cmd_clear(&ctx, yes),
        Some(Commands::Profile(ProfileCommands::Validate { file })) => {
            profile::cmd_profile_validate(&file)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Context
// ============================================================================

/// Resolved settings for one invocation. Flags win over settings.json.
pub struct Context {
    pub settings: Settings,
    pub ledger_path: PathBuf,
    pub profile: Option<PathBuf>,
}

impl Context {
    fn new(config: Option<PathBuf>, ledger: Option<PathBuf>, profile: Option<PathBuf>) -> Self {
        let settings = match config {
            Some(path) => Settings::load_from(&path),
            None => Settings::load(),
        };
        let ledger_path = ledger
            .or_else(|| settings.ledger_path.clone())
            .unwrap_or_else(JsonFileStore::default_path);
        let profile = profile.or_else(|| settings.profile.clone());
        log::debug!("ledger file: {}", ledger_path.display());
        if let Some(path) = &profile {
            log::debug!("normalizer profile: {}", path.display());
        }
        Self {
            settings,
            ledger_path,
            profile,
        }
    }

    pub fn normalizer(&self) -> Result<Normalizer, CliError> {
        let config = match &self.profile {
            Some(path) => profile::load_profile(path)?,
            None => NormalizerConfig::default(),
        };
        Normalizer::new(config).map_err(|e| CliError::profile(e.to_string()))
    }

    pub fn tracker(&self) -> Result<Tracker<JsonFileStore>, CliError> {
        Ok(Tracker::new(
            JsonFileStore::new(&self.ledger_path),
            self.normalizer()?,
        ))
    }
}

/// Read a file, or stdin for `None` / `-`.
pub fn read_input(input: Option<&Path>) -> Result<String, CliError> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| CliError::input(format!("{}: {}", path.display(), e))),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::input(format!("stdin: {}", e)))?;
            Ok(buf)
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT_READ, msg)
    }

    pub fn profile(msg: impl Into<String>) -> Self {
        Self::new(exit_codes::EXIT_PROFILE_INVALID, msg)
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Create error from store error with proper exit code.
    pub fn store(err: StoreError) -> Self {
        let hint = match &err {
            StoreError::Corrupt { path, .. } => Some(format!(
                "move {} aside or run `spendtrack clear --yes` to start over",
                path.display()
            )),
            _ => None,
        };
        Self { code: store_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::store(err)
    }
}
