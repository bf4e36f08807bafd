// Report commands: summary, recent, top, monthly, total, clear
//
// Human output goes to stdout as aligned text. `--json` prints the raw
// report values (unrounded amounts, UTC timestamps) for scripts.

use std::fmt::Write;

use chrono::Local;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use spendtrack_config::Settings;
use spendtrack_ledger::{Ledger, LedgerEntry, MonthTotal};

use crate::util::{display_width, pad_left, pad_right};
use crate::{CliError, Context};

const LABEL_WIDTH: usize = 24;

fn load(ctx: &Context) -> Result<Ledger, CliError> {
    Ok(ctx.tracker()?.snapshot()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| CliError::other(e.to_string()))?;
    println!("{}", out);
    Ok(())
}

/// Whole currency units, halves rounded up.
pub(crate) fn rounded(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn money(settings: &Settings, amount: Decimal) -> String {
    format!("{}{}", settings.currency_symbol, amount.normalize())
}

pub(crate) fn orders_tracked(count: usize) -> String {
    format!("{} Orders Tracked", count)
}

/// Local calendar date of an entry in the configured format, ISO if the
/// format cannot be rendered.
fn local_date(settings: &Settings, entry: &LedgerEntry) -> String {
    let local = entry.occurred_at.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(&settings.date_format)).is_err() {
        log::warn!("cannot render date format '{}'", settings.date_format);
        return local.format("%Y-%m-%d").to_string();
    }
    out
}

fn print_entries(settings: &Settings, entries: &[LedgerEntry]) {
    if entries.is_empty() {
        println!("  (no orders)");
        return;
    }

    let dates: Vec<String> = entries.iter().map(|e| local_date(settings, e)).collect();
    let amounts: Vec<String> = entries.iter().map(|e| money(settings, e.amount)).collect();
    let date_w = dates.iter().map(|d| display_width(d)).max().unwrap_or(0);
    let amount_w = amounts.iter().map(|a| display_width(a)).max().unwrap_or(0);

    for ((entry, date), amount) in entries.iter().zip(&dates).zip(&amounts) {
        println!(
            "  {}  {}  {}",
            pad_right(date, date_w),
            pad_right(&entry.label, LABEL_WIDTH),
            pad_left(amount, amount_w)
        );
    }
}

fn print_months(settings: &Settings, months: &[MonthTotal]) {
    if months.is_empty() {
        println!("  (no orders)");
        return;
    }

    let amounts: Vec<String> = months.iter().map(|m| money(settings, m.total)).collect();
    let amount_w = amounts.iter().map(|a| display_width(a)).max().unwrap_or(0);

    for (month, amount) in months.iter().zip(&amounts) {
        println!(
            "  {}  {}  ({} order{})",
            month.month,
            pad_left(amount, amount_w),
            month.count,
            if month.count == 1 { "" } else { "s" }
        );
    }
}

fn limit(entries: Vec<LedgerEntry>, max: Option<usize>) -> Vec<LedgerEntry> {
    match max {
        Some(n) => entries.into_iter().take(n).collect(),
        None => entries,
    }
}

pub fn cmd_summary(ctx: &Context, top: Option<usize>, json: bool) -> Result<(), CliError> {
    let ledger = load(ctx)?;
    let top = top.unwrap_or(ctx.settings.top_n);
    let mut summary = spendtrack_ledger::summarize(&ledger, top);
    summary.recent = limit(summary.recent, ctx.settings.recent_limit);

    if json {
        return print_json(&summary);
    }

    let settings = &ctx.settings;
    println!("Total Spend: {}", money(settings, rounded(summary.total)));
    println!("{}", orders_tracked(summary.count));

    println!();
    println!("Recent:");
    print_entries(settings, &summary.recent);

    println!();
    println!("Top {}:", top);
    print_entries(settings, &summary.top);

    println!();
    println!("Monthly:");
    print_months(settings, &summary.monthly);
    Ok(())
}

pub fn cmd_recent(ctx: &Context, max: Option<usize>, json: bool) -> Result<(), CliError> {
    let ledger = load(ctx)?;
    let entries = limit(
        spendtrack_ledger::recent(&ledger),
        max.or(ctx.settings.recent_limit),
    );

    if json {
        return print_json(&entries);
    }
    print_entries(&ctx.settings, &entries);
    Ok(())
}

pub fn cmd_top(ctx: &Context, n: Option<usize>, json: bool) -> Result<(), CliError> {
    let ledger = load(ctx)?;
    let entries = spendtrack_ledger::top_n(&ledger, n.unwrap_or(ctx.settings.top_n));

    if json {
        return print_json(&entries);
    }
    print_entries(&ctx.settings, &entries);
    Ok(())
}

pub fn cmd_monthly(ctx: &Context, json: bool) -> Result<(), CliError> {
    let ledger = load(ctx)?;
    let months = spendtrack_ledger::monthly(&ledger);

    if json {
        return print_json(&months);
    }
    print_months(&ctx.settings, &months);
    Ok(())
}

#[derive(Serialize)]
struct TotalJson {
    count: usize,
    total: Decimal,
}

pub fn cmd_total(ctx: &Context, json: bool) -> Result<(), CliError> {
    let ledger = load(ctx)?;
    let total = spendtrack_ledger::total(&ledger);

    if json {
        return print_json(&TotalJson { count: ledger.len(), total });
    }
    println!("{}", money(&ctx.settings, rounded(total)));
    Ok(())
}

pub fn cmd_clear(ctx: &Context, yes: bool) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::args("refusing to clear the ledger without confirmation")
            .with_hint("re-run with --yes"));
    }
    let ledger = ctx.tracker()?.clear()?;
    println!("Cleared ({})", orders_tracked(ledger.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn total_rounds_half_up() {
        assert_eq!(rounded(d("676.5")), d("677"));
        assert_eq!(rounded(d("676.49")), d("676"));
        assert_eq!(rounded(d("0")), d("0"));
    }

    #[test]
    fn money_drops_trailing_zeros() {
        let settings = Settings::default();
        assert_eq!(money(&settings, d("189.00")), "₹189");
        assert_eq!(money(&settings, d("412.50")), "₹412.5");
    }

    #[test]
    fn bad_date_format_does_not_panic() {
        use chrono::{DateTime, Utc};
        use spendtrack_ledger::Provenance;

        let entry = LedgerEntry {
            seq: 1,
            external_id: None,
            occurred_at: DateTime::parse_from_rfc3339("2026-01-15T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            amount: d("99"),
            label: "Order".into(),
            provenance: Provenance::Manual,
        };
        let settings = Settings {
            date_format: "%Q".into(),
            ..Settings::default()
        };
        let expected = entry.occurred_at.with_timezone(&Local).format("%Y-%m-%d").to_string();
        assert_eq!(local_date(&settings, &entry), expected);
    }

    #[test]
    fn count_line() {
        assert_eq!(orders_tracked(0), "0 Orders Tracked");
        assert_eq!(orders_tracked(5), "5 Orders Tracked");
    }
}
