// End-to-end tests for the spendtrack binary: exit codes, --json stdout
// contract and persistence between invocations.
//
// Every test gets its own ledger and settings file in a temp dir so nothing
// touches the user's real data.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../ledger/tests/fixtures")
        .join(name)
}

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    fn ledger(&self) -> PathBuf {
        self.dir.path().join("ledger.json")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_spendtrack"));
        cmd.env_remove("SPENDTRACK_LEDGER")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.dir.path().join("settings.json"))
            .arg("--ledger")
            .arg(self.ledger());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.cmd().args(args).output().expect("spawn spendtrack")
    }

    fn run_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .cmd()
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn spendtrack");
        child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
        child.wait_with_output().unwrap()
    }
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// stdout must be exactly one JSON value.
fn json(output: &Output) -> serde_json::Value {
    assert_ok(output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be valid JSON: {}\n{}", e, stdout))
}

/// Decimal amounts serialize as strings.
fn amount(v: &serde_json::Value) -> f64 {
    v.as_str().expect("amount string").parse().unwrap()
}

// ===========================================================================
// ingest
// ===========================================================================

#[test]
fn ingest_fixture_then_replay() {
    let sb = Sandbox::new();
    let path = fixture("list.json");

    let first = json(&sb.run(&["ingest", path.to_str().unwrap(), "--json"]));
    assert_eq!(first["candidates"], 3);
    assert_eq!(first["admitted"], 3);
    assert_eq!(amount(&first["total"]), 676.5);

    let again = json(&sb.run(&["ingest", path.to_str().unwrap(), "--json"]));
    assert_eq!(again["admitted"], 0);
    assert_eq!(again["count"], 3);
}

#[test]
fn ingest_every_shape_lands_on_one_ledger() {
    let sb = Sandbox::new();
    for name in ["list.json", "results.json", "data_orders.json", "store_orders.json"] {
        assert_ok(&sb.run(&["ingest", fixture(name).to_str().unwrap()]));
    }
    let total = json(&sb.run(&["total", "--json"]));
    assert_eq!(total["count"], 3);
}

#[test]
fn ingest_from_stdin() {
    let sb = Sandbox::new();
    let out = sb.run_stdin(
        &["ingest", "-", "--json"],
        r#"{"results": [{"id": "A1", "amount": 100}]}"#,
    );
    assert_eq!(json(&out)["admitted"], 1);
}

#[test]
fn ingest_unrecognized_payload_is_not_an_error() {
    let sb = Sandbox::new();
    let out = sb.run_stdin(&["ingest", "--json"], r#"{"message": "ok"}"#);
    let val = json(&out);
    assert_eq!(val["candidates"], 0);
    assert_eq!(val["count"], 0);
    assert!(!sb.ledger().exists(), "nothing admitted, nothing written");
}

#[test]
fn ingest_rejects_non_json() {
    let sb = Sandbox::new();
    let out = sb.run_stdin(&["ingest"], "<html>orders</html>");
    assert_eq!(out.status.code(), Some(11));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not JSON"));
}

#[test]
fn ingest_with_url_filters_endpoints() {
    let sb = Sandbox::new();
    let body = r#"[{"order_id": 7, "grand_total": 320}]"#;

    let cart = json(&sb.run_stdin(&["ingest", "--url", "https://shop.example/api/cart", "--json"], body));
    assert_eq!(cart["candidates"], 0);

    let orders = json(&sb.run_stdin(
        &["ingest", "--url", "https://shop.example/api/Order-History", "--json"],
        body,
    ));
    assert_eq!(orders["admitted"], 1);

    // Non-JSON bodies from order endpoints are dropped quietly.
    let html = sb.run_stdin(&["ingest", "--url", "https://shop.example/orders"], "<html/>");
    assert_ok(&html);
}

#[test]
fn ingest_missing_file() {
    let sb = Sandbox::new();
    let out = sb.run(&["ingest", "/definitely/not/here.json"]);
    assert_eq!(out.status.code(), Some(10));
}

// ===========================================================================
// scan / add
// ===========================================================================

#[test]
fn scan_listing_page_twice() {
    let sb = Sandbox::new();
    let page = fixture("listing_page.txt");

    let first = json(&sb.run(&["scan", page.to_str().unwrap(), "--json"]));
    assert_eq!(first["admitted"], 4);
    assert_eq!(amount(&first["total"]), 813.0);

    let again = json(&sb.run(&["scan", page.to_str().unwrap(), "--json"]));
    assert_eq!(again["admitted"], 0);
}

#[test]
fn scan_page_without_prices() {
    let sb = Sandbox::new();
    let out = sb.run_stdin(&["scan"], "Your cart is empty");
    assert_ok(&out);
    assert!(String::from_utf8_lossy(&out.stdout).contains("No orders found"));
}

#[test]
fn add_manual_entry_and_duplicate() {
    let sb = Sandbox::new();
    let args = ["add", "--amount", "120", "--label", "Pharmacy", "--date", "2026-01-03", "--json"];

    assert_eq!(json(&sb.run(&args))["admitted"], 1);
    assert_eq!(json(&sb.run(&args))["admitted"], 0);

    let recent = json(&sb.run(&["recent", "--json"]));
    let entries = recent.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["label"], "Pharmacy");
    assert_eq!(entries[0]["provenance"], "manual");
}

#[test]
fn add_rejects_bad_input() {
    let sb = Sandbox::new();
    for args in [
        vec!["add", "--amount", "-5", "--label", "Refund"],
        vec!["add", "--amount", "0"],
        vec!["add", "--amount", "ten"],
        vec!["add", "--amount", "10", "--label", "   "],
        vec!["add", "--amount", "10", "--date", "03/01/2026"],
    ] {
        let out = sb.run(&args);
        assert_eq!(out.status.code(), Some(12), "args: {:?}", args);
    }
    assert!(!sb.ledger().exists());
}

// ===========================================================================
// reports
// ===========================================================================

#[test]
fn summary_json_shape() {
    let sb = Sandbox::new();
    assert_ok(&sb.run(&["ingest", fixture("results.json").to_str().unwrap()]));

    let val = json(&sb.run(&["summary", "--json", "--top", "2"]));
    assert_eq!(val["count"], 3);
    assert_eq!(amount(&val["total"]), 676.5);
    assert_eq!(val["recent"].as_array().unwrap().len(), 3);
    assert_eq!(val["top"].as_array().unwrap().len(), 2);
    assert_eq!(amount(&val["top"][0]["amount"]), 412.5);

    let months: Vec<&str> = val["monthly"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["month"].as_str().unwrap())
        .collect();
    assert_eq!(months, vec!["2026-02", "2026-01"]);
}

#[test]
fn summary_human_output() {
    let sb = Sandbox::new();
    assert_ok(&sb.run(&["ingest", fixture("list.json").to_str().unwrap()]));

    let out = sb.run(&["summary"]);
    assert_ok(&out);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Total Spend: ₹677"), "{}", stdout);
    assert!(stdout.contains("3 Orders Tracked"), "{}", stdout);
}

#[test]
fn reports_on_empty_ledger() {
    let sb = Sandbox::new();
    let total = json(&sb.run(&["total", "--json"]));
    assert_eq!(total["count"], 0);
    assert_eq!(amount(&total["total"]), 0.0);

    assert_eq!(json(&sb.run(&["monthly", "--json"])), serde_json::json!([]));
    assert_eq!(json(&sb.run(&["top", "--json"])), serde_json::json!([]));
}

#[test]
fn top_respects_n() {
    let sb = Sandbox::new();
    assert_ok(&sb.run(&["ingest", fixture("list.json").to_str().unwrap()]));
    let top = json(&sb.run(&["top", "-n", "1", "--json"]));
    assert_eq!(top.as_array().unwrap().len(), 1);
    assert_eq!(top[0]["external_id"], "ZP-1001");
}

#[test]
fn corrupt_ledger_exit_code() {
    let sb = Sandbox::new();
    std::fs::write(sb.ledger(), "{ not json").unwrap();
    let out = sb.run(&["total"]);
    assert_eq!(out.status.code(), Some(21));
    assert!(String::from_utf8_lossy(&out.stderr).contains("hint:"));
}

// ===========================================================================
// clear / profile
// ===========================================================================

#[test]
fn clear_requires_confirmation() {
    let sb = Sandbox::new();
    assert_ok(&sb.run(&["ingest", fixture("list.json").to_str().unwrap()]));

    assert_eq!(sb.run(&["clear"]).status.code(), Some(2));
    assert_eq!(json(&sb.run(&["total", "--json"]))["count"], 3);

    assert_ok(&sb.run(&["clear", "--yes"]));
    assert_eq!(json(&sb.run(&["total", "--json"]))["count"], 0);
}

#[test]
fn profile_validate() {
    let sb = Sandbox::new();
    let good = sb.dir.path().join("good.toml");
    std::fs::write(&good, "label = \"Grocery order\"\ncurrency_symbols = [\"€\"]\n").unwrap();
    let out = sb.run(&["profile", "validate", good.to_str().unwrap()]);
    assert_ok(&out);
    assert!(String::from_utf8_lossy(&out.stdout).contains("Grocery order"));

    let bad = sb.dir.path().join("bad.toml");
    std::fs::write(&bad, "currency_symbols = []\n").unwrap();
    assert_eq!(sb.run(&["profile", "validate", bad.to_str().unwrap()]).status.code(), Some(31));

    let missing = sb.dir.path().join("missing.toml");
    assert_eq!(sb.run(&["profile", "validate", missing.to_str().unwrap()]).status.code(), Some(30));
}

#[test]
fn profile_changes_scan_symbols() {
    let sb = Sandbox::new();
    let profile = sb.dir.path().join("euro.toml");
    std::fs::write(&profile, "currency_symbols = [\"€\"]\n").unwrap();

    let out = sb.run_stdin(
        &["--profile", profile.to_str().unwrap(), "scan", "--json"],
        "Total €42.50 (₹3800)",
    );
    let val = json(&out);
    assert_eq!(val["admitted"], 1);
    assert_eq!(amount(&val["total"]), 42.5);
}
