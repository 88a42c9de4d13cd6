#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use super::*;
use crate::models::FinancialAmount;

fn amt(value: Decimal) -> FinancialAmount {
    FinancialAmount::new(value).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const APP_STATE: &str = r#"{
  "debts": [
    {
      "id": "k3j2h1",
      "name": "Visa",
      "amount": 2500,
      "apr": "19.99",
      "minPayment": 75,
      "paid": 300.5,
      "targetDate": "2025-06-01",
      "payments": [
        { "id": "p1", "amount": 300.5, "note": "", "date": "2024-01-03T10:00:00.000Z" }
      ],
      "recurring": {
        "amount": 150,
        "freq": "monthly",
        "startDate": "2024-01-15",
        "enabled": true,
        "lastApplied": null
      }
    },
    { "name": "Loan from Sam", "amount": "1,000", "paid": "oops" }
  ],
  "savings": [
    {
      "id": 7,
      "name": "Trip",
      "target": 1200,
      "balance": 40,
      "history": [
        { "amount": 40, "note": "Recurring", "date": "2024-02-02T00:00:00.000Z" }
      ],
      "recurring": {
        "amount": 40,
        "freq": "weekly",
        "startDate": "2024-02-02",
        "enabled": true,
        "lastApplied": "2024-02-02"
      }
    }
  ],
  "investments": [],
  "assets": [{ "name": "Car", "value": 9000 }],
  "settings": { "theme": "dark" }
}"#;

// ── Parsing app state ─────────────────────────────────────────

#[test]
fn test_parse_app_state() {
    let portfolio = from_json(APP_STATE).unwrap();
    assert_eq!(portfolio.debts.len(), 2);
    assert_eq!(portfolio.savings.len(), 1);

    let visa = &portfolio.debts[0];
    assert_eq!(visa.id, "k3j2h1");
    assert_eq!(visa.principal, amt(dec!(2500)));
    assert_eq!(visa.apr, amt(dec!(19.99)));
    assert_eq!(visa.min_payment, amt(dec!(75)));
    assert_eq!(visa.paid_to_date(), amt(dec!(300.5)));
    assert_eq!(visa.payments().len(), 1);
    assert_eq!(visa.payments()[0].date, date(2024, 1, 3));
    assert_eq!(visa.payments()[0].kind, EntryKind::Manual);

    let rule = visa.recurring.as_ref().unwrap();
    assert_eq!(rule.cadence, Cadence::Monthly);
    assert_eq!(rule.start_date, date(2024, 1, 15));
    assert!(rule.enabled);
    assert!(rule.last_applied().is_none());
}

#[test]
fn test_missing_fields_coerced() {
    let portfolio = from_json(APP_STATE).unwrap();
    let loan = &portfolio.debts[1];
    assert_eq!(loan.id, "debt-2");
    assert_eq!(loan.name, "Loan from Sam");
    assert_eq!(loan.principal, amt(dec!(1000)));
    assert_eq!(loan.paid_to_date(), FinancialAmount::ZERO);
    assert_eq!(loan.apr, FinancialAmount::ZERO);
    assert_eq!(loan.min_payment, FinancialAmount::ZERO);
    assert!(loan.recurring.is_none());
}

#[test]
fn test_savings_parsed() {
    let portfolio = from_json(APP_STATE).unwrap();
    let trip = &portfolio.savings[0];
    assert_eq!(trip.id, "7");
    assert_eq!(trip.target_amount, Some(amt(dec!(1200))));
    assert_eq!(trip.balance(), amt(dec!(40)));
    assert_eq!(trip.history()[0].kind, EntryKind::Recurring);
    let rule = trip.recurring.as_ref().unwrap();
    assert_eq!(rule.last_applied(), Some(date(2024, 2, 2)));
}

#[test]
fn test_empty_object_is_empty_portfolio() {
    assert_eq!(from_json("{}").unwrap(), Portfolio::default());
}

#[test]
fn test_invalid_json_errors() {
    assert!(from_json("not json").is_err());
}

// ── Recurring rule coercion ───────────────────────────────────

#[test]
fn test_unreadable_rules_kept_verbatim() {
    let json = r#"{
      "savings": [
        { "name": "NoCadence", "recurring": { "amount": 10, "startDate": "2024-01-01", "enabled": true } },
        { "name": "BadCadence", "recurring": { "amount": 10, "freq": "daily", "startDate": "2024-01-01", "enabled": true } },
        { "name": "NoStart", "recurring": { "amount": 10, "freq": "weekly", "enabled": true } }
      ]
    }"#;
    let portfolio = from_json(json).unwrap();
    assert_eq!(portfolio.savings.len(), 3);
    for goal in &portfolio.savings {
        assert!(goal.recurring.is_none());
        assert!(goal.extra().contains_key("recurring"));
    }

    let out: Value = serde_json::from_str(&to_json(&portfolio).unwrap()).unwrap();
    assert_eq!(
        out["savings"][0]["recurring"],
        json!({ "amount": 10, "startDate": "2024-01-01", "enabled": true })
    );
    assert_eq!(out["savings"][1]["recurring"]["freq"], "daily");
    assert!(out["savings"][2]["recurring"].get("startDate").is_none());
}

#[test]
fn test_zero_amount_rule_kept_inactive() {
    let json = r#"{ "savings": [
        { "name": "Paused", "recurring": { "amount": 0, "freq": "weekly", "startDate": "2024-01-01", "enabled": false } }
    ] }"#;
    let portfolio = from_json(json).unwrap();
    let rule = portfolio.savings[0].recurring.as_ref().unwrap();
    assert!(!rule.is_active());

    let out: Value = serde_json::from_str(&to_json(&portfolio).unwrap()).unwrap();
    let saved = &out["savings"][0]["recurring"];
    assert_eq!(saved["amount"], 0.0);
    assert_eq!(saved["freq"], "weekly");
    assert_eq!(saved["startDate"], "2024-01-01");
    assert_eq!(saved["enabled"], false);
}

#[test]
fn test_rule_enabled_defaults_false() {
    let json = r#"{ "savings": [
        { "name": "S", "recurring": { "amount": 10, "freq": "weekly", "startDate": "2024-01-01" } }
    ] }"#;
    let portfolio = from_json(json).unwrap();
    assert!(!portfolio.savings[0].recurring.as_ref().unwrap().enabled);
}

#[test]
fn test_off_schedule_cursor_snapped() {
    let json = r#"{ "debts": [
        { "name": "D", "amount": 500, "recurring": {
            "amount": 10, "freq": "biweekly", "startDate": "2024-01-01",
            "enabled": true, "lastApplied": "2024-01-20" } }
    ] }"#;
    let portfolio = from_json(json).unwrap();
    let rule = portfolio.debts[0].recurring.as_ref().unwrap();
    assert_eq!(rule.last_applied(), Some(date(2024, 1, 15)));
}

#[test]
fn test_chained_monthly_cursor_not_reapplied() {
    // Stored by stepping Jan 31 -> Feb 29 -> Mar 29.
    let json = r#"{ "debts": [
        { "name": "Loan", "amount": 5000, "recurring": {
            "amount": 100, "freq": "monthly", "startDate": "2024-01-31",
            "enabled": true, "lastApplied": "2024-03-29" } }
    ] }"#;
    let portfolio = from_json(json).unwrap();
    let debt = &portfolio.debts[0];
    assert_eq!(
        debt.recurring.as_ref().unwrap().last_applied(),
        Some(date(2024, 3, 31))
    );

    assert!(crate::engine::apply_due(debt, date(2024, 4, 1)).occurrences.is_empty());
    let april = crate::engine::apply_due(debt, date(2024, 4, 30));
    assert_eq!(april.occurrences.len(), 1);
    assert_eq!(april.occurrences[0].date, date(2024, 4, 30));
}

// ── Round trip through the file ───────────────────────────────

#[test]
fn test_save_then_load_preserves_portfolio() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");
    let portfolio = from_json(APP_STATE).unwrap();

    save(&path, &portfolio).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(loaded, portfolio);
}

#[test]
fn test_host_app_fields_survive_save() {
    let portfolio = from_json(APP_STATE).unwrap();
    let caught_up = crate::engine::catch_up(&portfolio, date(2024, 3, 1)).portfolio;
    let out: Value = serde_json::from_str(&to_json(&caught_up).unwrap()).unwrap();

    assert_eq!(out["investments"], json!([]));
    assert_eq!(out["assets"][0]["value"], 9000);
    assert_eq!(out["settings"]["theme"], "dark");
    assert_eq!(out["debts"][0]["targetDate"], "2025-06-01");
    assert_eq!(out["debts"][0]["payments"][0]["id"], "p1");
    assert!(out["debts"][1].get("recurring").is_none());
}

#[test]
fn test_load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, Portfolio::default());
}

#[test]
fn test_load_corrupt_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ broken").unwrap();
    let err = load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Invalid state file"));
}
