#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use rust_decimal_macros::dec;
use wealthtrack::config::LogFormat;

use super::*;

const STATE: &str = r#"{
  "debts": [
    {
      "id": "card",
      "name": "Visa",
      "amount": 1000,
      "apr": 22.9,
      "minPayment": 35,
      "paid": 0,
      "recurring": { "amount": 100, "freq": "monthly", "startDate": "2024-01-10", "enabled": true }
    }
  ],
  "savings": [
    {
      "id": "fund",
      "name": "Emergency",
      "target": 1000,
      "balance": 0,
      "recurring": { "amount": 25, "freq": "weekly", "startDate": "2024-01-01", "enabled": true }
    }
  ]
}"#;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn settings_at(path: PathBuf) -> Settings {
    Settings {
        state_path: path,
        log_filter: "off".into(),
        log_format: LogFormat::Text,
        reminder_days: 30,
    }
}

fn seeded() -> (tempfile::TempDir, Settings) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, STATE).unwrap();
    let settings = settings_at(path);
    (dir, settings)
}

// ── Argument helpers ──────────────────────────────────────────

#[test]
fn test_flag_reads_following_value() {
    let a = args(&["--budget", "500", "--strategy", "snowball"]);
    assert_eq!(flag(&a, "--budget"), Some("500"));
    assert_eq!(flag(&a, "--strategy"), Some("snowball"));
    assert_eq!(flag(&a, "--debts"), None);
}

#[test]
fn test_flag_without_value_is_none() {
    let a = args(&["--budget"]);
    assert_eq!(flag(&a, "--budget"), None);
}

#[test]
fn test_has_switch() {
    let a = args(&["--as-of", "2024-02-01", "--dry-run"]);
    assert!(has_switch(&a, "--dry-run"));
    assert!(!has_switch(&a, "--verbose"));
}

#[test]
fn test_as_of_parses_date() {
    let a = args(&["--as-of", "2024-02-29"]);
    assert_eq!(
        as_of(&a).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert!(as_of(&args(&["--as-of", "02/29/2024"])).is_err());
}

// ── Dispatch ──────────────────────────────────────────────────

#[test]
fn test_no_command_prints_usage() {
    let (_dir, settings) = seeded();
    assert!(as_cli(&args(&["wealthtrack"]), &settings).is_ok());
    assert!(as_cli(&args(&["wealthtrack", "help"]), &settings).is_ok());
}

#[test]
fn test_unknown_command_errors() {
    let (_dir, settings) = seeded();
    let err = as_cli(&args(&["wealthtrack", "launch"]), &settings).unwrap_err();
    assert!(err.to_string().contains("Unknown command: launch"));
}

// ── catch-up ──────────────────────────────────────────────────

#[test]
fn test_catch_up_saves_state() {
    let (_dir, settings) = seeded();
    let a = args(&["wealthtrack", "catch-up", "--as-of", "2024-02-15"]);
    as_cli(&a, &settings).unwrap();

    let saved = input::load(&settings.state_path).unwrap();
    // Jan 10 and Feb 10.
    assert_eq!(saved.debts[0].paid_to_date().value(), dec!(200));
    // Jan 1, 8, 15, 22, 29, Feb 5, 12.
    assert_eq!(saved.savings[0].balance().value(), dec!(175));

    // Running again for the same date applies nothing new.
    as_cli(&a, &settings).unwrap();
    assert_eq!(input::load(&settings.state_path).unwrap(), saved);
}

#[test]
fn test_catch_up_keeps_host_app_fields() {
    let (_dir, settings) = seeded();
    let state = STATE.replacen('{', r#"{ "settings": { "theme": "dark" }, "investments": [],"#, 1);
    std::fs::write(&settings.state_path, state).unwrap();

    as_cli(&args(&["wealthtrack", "catch-up", "--as-of", "2024-02-15"]), &settings).unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&settings.state_path).unwrap()).unwrap();
    assert_eq!(saved["settings"]["theme"], "dark");
    assert!(saved["investments"].is_array());
}

#[test]
fn test_catch_up_dry_run_leaves_file() {
    let (_dir, settings) = seeded();
    let a = args(&["wealthtrack", "c", "--as-of", "2024-02-15", "--dry-run"]);
    as_cli(&a, &settings).unwrap();
    assert_eq!(std::fs::read_to_string(&settings.state_path).unwrap(), STATE);
}

#[test]
fn test_catch_up_without_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_at(dir.path().join("absent.json"));
    let a = args(&["wealthtrack", "catch-up", "--as-of", "2024-02-15"]);
    as_cli(&a, &settings).unwrap();
    assert!(!settings.state_path.exists());
}

// ── payoff ────────────────────────────────────────────────────

#[test]
fn test_payoff_requires_budget() {
    let (_dir, settings) = seeded();
    let err = as_cli(&args(&["wealthtrack", "payoff"]), &settings).unwrap_err();
    assert!(err.to_string().contains("--budget"));
}

#[test]
fn test_payoff_rejects_bad_budget() {
    let (_dir, settings) = seeded();
    let a = args(&["wealthtrack", "payoff", "--budget", "lots"]);
    let err = as_cli(&a, &settings).unwrap_err();
    assert!(err.to_string().contains("Invalid budget"));
}

#[test]
fn test_payoff_rejects_unknown_strategy() {
    let (_dir, settings) = seeded();
    let a = args(&["wealthtrack", "payoff", "--budget", "500", "--strategy", "yolo"]);
    assert!(as_cli(&a, &settings).is_err());
}

#[test]
fn test_payoff_from_state_and_csv() {
    let (dir, settings) = seeded();
    let compare = args(&["wealthtrack", "payoff", "--budget", "$500", "--as-of", "2024-02-15"]);
    as_cli(&compare, &settings).unwrap();

    let csv_path = dir.path().join("debts.csv");
    std::fs::write(
        &csv_path,
        "name,balance,apr,min_payment\nCard,1200,24,50\nCar,5000,6,150\n",
    )
    .unwrap();
    let single = args(&[
        "wealthtrack",
        "payoff",
        "--budget",
        "600",
        "--strategy",
        "avalanche",
        "--debts",
        csv_path.to_str().unwrap(),
    ]);
    as_cli(&single, &settings).unwrap();
}

#[test]
fn test_payoff_failure_is_reported_not_raised() {
    let (_dir, settings) = seeded();
    // Below the card's minimum: shown inline, the command still succeeds.
    let a = args(&[
        "wealthtrack",
        "payoff",
        "--budget",
        "10",
        "--strategy",
        "snowball",
        "--as-of",
        "2024-02-15",
    ]);
    assert!(as_cli(&a, &settings).is_ok());
}

// ── upcoming / summary ────────────────────────────────────────

#[test]
fn test_upcoming_and_summary_do_not_write() {
    let (_dir, settings) = seeded();
    as_cli(
        &args(&["wealthtrack", "upcoming", "--days", "14", "--as-of", "2024-02-15"]),
        &settings,
    )
    .unwrap();
    as_cli(&args(&["wealthtrack", "s", "--as-of", "2024-02-15"]), &settings).unwrap();
    assert_eq!(std::fs::read_to_string(&settings.state_path).unwrap(), STATE);
}

#[test]
fn test_upcoming_rejects_bad_days() {
    let (_dir, settings) = seeded();
    let a = args(&["wealthtrack", "upcoming", "--days", "soon"]);
    assert!(as_cli(&a, &settings).is_err());
}
