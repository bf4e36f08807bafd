// Observation commands: ingest, scan, add

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use spendtrack_ledger::capture::decode_body;
use spendtrack_ledger::ManualEntry;
use spendtrack_store::{AdmitReport, TrackerError};

use crate::exit_codes::{EXIT_INPUT_NOT_JSON, EXIT_MANUAL_INVALID};
use crate::{read_input, CliError, Context};

/// Stable JSON shape for `--json` on observation commands.
#[derive(Serialize)]
struct AdmitJson {
    candidates: usize,
    admitted: usize,
    count: usize,
    total: Decimal,
}

impl From<&AdmitReport> for AdmitJson {
    fn from(report: &AdmitReport) -> Self {
        Self {
            candidates: report.candidates,
            admitted: report.admitted,
            count: report.ledger.len(),
            total: spendtrack_ledger::total(&report.ledger),
        }
    }
}

fn print_report(report: &AdmitReport, json: bool) -> Result<(), CliError> {
    if json {
        let out = serde_json::to_string_pretty(&AdmitJson::from(report))
            .map_err(|e| CliError::other(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    match report.admitted {
        0 if report.candidates == 0 => println!("No orders found"),
        0 => println!("No new orders ({} already tracked)", report.candidates),
        n => println!(
            "Saved {} new order{} ({} tracked)",
            n,
            if n == 1 { "" } else { "s" },
            report.ledger.len()
        ),
    }
    Ok(())
}

pub fn cmd_ingest(
    ctx: &Context,
    input: Option<PathBuf>,
    url: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let body = read_input(input.as_deref())?;
    let tracker = ctx.tracker()?;

    let report = match url {
        // Captured responses with a URL go through the endpoint filter, which
        // silently drops non-JSON bodies.
        Some(url) => tracker.ingest_response(&url, &body)?,
        None => {
            let raw = decode_body(&body).ok_or_else(|| {
                CliError::new(EXIT_INPUT_NOT_JSON, "input is not JSON")
                    .with_hint("use `spendtrack scan` for page text")
            })?;
            tracker.ingest_payload(&raw)?
        }
    };

    print_report(&report, json)
}

pub fn cmd_scan(ctx: &Context, input: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let text = read_input(input.as_deref())?;
    let report = ctx.tracker()?.ingest_text(&text)?;
    print_report(&report, json)
}

pub fn cmd_add(
    ctx: &Context,
    amount: &str,
    label: String,
    date: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|_| CliError::new(EXIT_MANUAL_INVALID, format!("invalid amount '{}'", amount)))?;

    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            CliError::new(EXIT_MANUAL_INVALID, format!("invalid date '{}'", s))
                .with_hint("dates are YYYY-MM-DD")
        })?,
        None => Local::now().date_naive(),
    };

    let entry = ManualEntry { label, amount, date };
    let report = ctx.tracker()?.add_manual(entry).map_err(|e| match e {
        TrackerError::Ledger(e) => CliError::new(EXIT_MANUAL_INVALID, e.to_string()),
        TrackerError::Store(e) => CliError::store(e),
    })?;

    print_report(&report, json)
}
