#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::filter::{AccountField, FilterOp, FilterValue};
use super::*;
use crate::db::Database;
use crate::error::Error;

fn make_account(id: i64, number: &str, balance: Decimal, account_type: &str) -> Account {
    let created = NaiveDate::from_ymd_opt(2023, 1, id as u32)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    Account {
        id,
        number: number.into(),
        balance,
        account_type: AccountType::parse(account_type),
        created,
        last_updated: created,
    }
}

/// Mirrors `sql/seed.sql`.
fn sample() -> Vec<Account> {
    vec![
        make_account(1, "ACC-10001", dec!(2500.50), "Checking"),
        make_account(2, "ACC-10002", dec!(5250.75), "Savings"),
        make_account(3, "ACC-10003", dec!(75000.00), "Investment"),
        make_account(4, "ACC-10004", dec!(103230.95), "Retirement"),
        make_account(5, "ACC-10005", dec!(325.80), "Checking"),
        make_account(6, "ACC-10006", dec!(1000.00), "Checking"),
        make_account(7, "ACC-10007", dec!(750.25), "Savings"),
        make_account(8, "ACC-10008", dec!(950.00), "Savings"),
        make_account(9, "ACC-10009", dec!(15000.00), "Investment"),
        make_account(10, "ACC-10010", dec!(10000.00), "Checking"),
    ]
}

fn numbers(accounts: &[Account]) -> Vec<&str> {
    accounts.iter().map(|a| a.number.as_str()).collect()
}

fn by_number<'a>(accounts: &'a [Account], number: &str) -> &'a Account {
    accounts.iter().find(|a| a.number == number).unwrap()
}

// ── compute_overview_metrics ──────────────────────────────────

#[test]
fn test_overview_on_sample() {
    let m = compute_overview_metrics(&sample());
    assert_eq!(m.total_accounts, 10);
    assert_eq!(m.total_balance, dec!(214008.25));
    assert_eq!(m.average_balance, dec!(21400.825));
}

#[test]
fn test_overview_counts_per_type_in_first_seen_order() {
    let m = compute_overview_metrics(&sample());
    assert_eq!(
        m.count_by_type,
        vec![
            (AccountType::Checking, 4),
            (AccountType::Savings, 3),
            (AccountType::Investment, 2),
            (AccountType::Retirement, 1),
        ]
    );
}

#[test]
fn test_overview_empty() {
    let m = compute_overview_metrics(&[]);
    assert_eq!(m, OverviewMetrics::default());
}

#[test]
fn test_overview_from_seeded_database() {
    let db = Database::open_in_memory().unwrap();
    let m = compute_overview_metrics(&db.fetch_all_accounts().unwrap());
    assert_eq!(m.total_accounts, 10);
    assert_eq!(m.total_balance, dec!(214008.25));
    assert_eq!(m.average_balance, dec!(21400.825));
}

#[test]
fn test_overview_keeps_negative_balances() {
    let accounts = vec![
        make_account(1, "A", dec!(-100.00), "Checking"),
        make_account(2, "B", dec!(300.00), "Checking"),
    ];
    let m = compute_overview_metrics(&accounts);
    assert_eq!(m.total_balance, dec!(200.00));
    assert_eq!(m.average_balance, dec!(100));
}

// ── compute_account_percentile ────────────────────────────────

#[test]
fn test_percentile_acc_10008_among_savings() {
    let accounts = sample();
    let subject = by_number(&accounts, "ACC-10008");
    let peers = peer_group(subject, &accounts);
    assert_eq!(numbers(&peers), vec!["ACC-10002", "ACC-10007", "ACC-10008"]);

    let p = compute_account_percentile(subject, &peers);
    assert!((p - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_percentile_unique_minimum_is_zero() {
    let accounts = sample();
    let subject = by_number(&accounts, "ACC-10007");
    let peers = peer_group(subject, &accounts);
    assert_eq!(compute_account_percentile(subject, &peers), 0.0);
}

#[test]
fn test_percentile_ties_do_not_count_as_lower() {
    let group = vec![
        make_account(1, "A", dec!(100), "Savings"),
        make_account(2, "B", dec!(100), "Savings"),
        make_account(3, "C", dec!(100), "Savings"),
        make_account(4, "D", dec!(50), "Savings"),
    ];
    let p = compute_account_percentile(&group[0], &group);
    assert!((p - 0.25).abs() < 1e-9);
}

#[test]
fn test_percentile_maximum_below_one() {
    let accounts = sample();
    let subject = by_number(&accounts, "ACC-10002");
    let peers = peer_group(subject, &accounts);
    let p = compute_account_percentile(subject, &peers);
    assert!((p - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_percentile_empty_peer_group() {
    let accounts = sample();
    assert_eq!(compute_account_percentile(&accounts[0], &[]), 0.0);
}

// ── filter_accounts ───────────────────────────────────────────

#[test]
fn test_filter_balance_range_inclusive() {
    let spec = FilterSpec::range("Balance", "1000", "10000");
    let out = filter_accounts(&sample(), &spec).unwrap();
    assert_eq!(
        numbers(&out),
        vec!["ACC-10001", "ACC-10002", "ACC-10006", "ACC-10010"]
    );
}

#[test]
fn test_filter_equals_type() {
    let spec = FilterSpec::new("AccountType", "equals", "Savings");
    let out = filter_accounts(&sample(), &spec).unwrap();
    assert_eq!(numbers(&out), vec!["ACC-10002", "ACC-10007", "ACC-10008"]);
}

#[test]
fn test_filter_not_equals_type() {
    let spec = FilterSpec::new("type", "!=", "Checking");
    let out = filter_accounts(&sample(), &spec).unwrap();
    assert_eq!(out.len(), 6);
    assert!(out.iter().all(|a| a.account_type != AccountType::Checking));
}

#[test]
fn test_filter_greater_than_is_strict() {
    let spec = FilterSpec::new("Balance", "greater-than", "10000");
    let out = filter_accounts(&sample(), &spec).unwrap();
    assert_eq!(numbers(&out), vec!["ACC-10003", "ACC-10004", "ACC-10009"]);
}

#[test]
fn test_filter_less_than_accepts_currency_formatting() {
    let spec = FilterSpec::new("Balance", "<", "$1,000.00");
    let out = filter_accounts(&sample(), &spec).unwrap();
    assert_eq!(numbers(&out), vec!["ACC-10005", "ACC-10007", "ACC-10008"]);
}

#[test]
fn test_filter_by_id_and_date() {
    let out = filter_accounts(&sample(), &FilterSpec::new("AccountID", "gt", "8")).unwrap();
    assert_eq!(numbers(&out), vec!["ACC-10009", "ACC-10010"]);

    let out = filter_accounts(
        &sample(),
        &FilterSpec::range("CreatedDate", "2023-01-02", "2023-01-03 23:59:59"),
    )
    .unwrap();
    assert_eq!(numbers(&out), vec!["ACC-10002", "ACC-10003"]);
}

#[test]
fn test_filter_preserves_input_order() {
    let mut accounts = sample();
    accounts.reverse();
    let out = filter_accounts(&accounts, &FilterSpec::range("Balance", "1000", "10000")).unwrap();
    assert_eq!(
        numbers(&out),
        vec!["ACC-10010", "ACC-10006", "ACC-10002", "ACC-10001"]
    );
}

#[test]
fn test_filter_unknown_operator() {
    let spec = FilterSpec::new("Balance", "contains", "1");
    assert!(matches!(
        filter_accounts(&sample(), &spec),
        Err(Error::InvalidFilter(_))
    ));
    // Validation happens even when there is nothing to filter
    assert!(matches!(
        filter_accounts(&[], &spec),
        Err(Error::InvalidFilter(_))
    ));
}

#[test]
fn test_filter_unknown_field() {
    let spec = FilterSpec::new("Nickname", "equals", "x");
    assert!(matches!(
        filter_accounts(&sample(), &spec),
        Err(Error::InvalidFilter(_))
    ));
}

#[test]
fn test_filter_bad_values() {
    for spec in [
        FilterSpec::new("Balance", "gt", "lots"),
        FilterSpec::new("AccountID", "eq", "1.5"),
        FilterSpec::new("LastUpdated", "lt", "soon"),
        FilterSpec::new("Balance", "range", "1000"),
        FilterSpec::range("Balance", "10000", "1000"),
        FilterSpec {
            field: "Balance".into(),
            operator: "gt".into(),
            value: FilterValue::Range("1".into(), "2".into()),
        },
    ] {
        assert!(
            matches!(filter_accounts(&sample(), &spec), Err(Error::InvalidFilter(_))),
            "expected invalid filter: {spec}"
        );
    }
}

#[test]
fn test_filter_spec_parse() {
    let spec = FilterSpec::parse("Balance range 1000 10000").unwrap();
    assert_eq!(spec, FilterSpec::range("Balance", "1000", "10000"));

    let spec = FilterSpec::parse(r#"AccountType = "Money Market""#).unwrap();
    assert_eq!(spec, FilterSpec::new("AccountType", "=", "Money Market"));

    assert!(FilterSpec::parse("Balance").is_err());
}

#[test]
fn test_operator_aliases() {
    assert_eq!(FilterOp::parse("EQ").unwrap(), FilterOp::Equals);
    assert_eq!(FilterOp::parse("<>").unwrap(), FilterOp::NotEquals);
    assert_eq!(FilterOp::parse("between").unwrap(), FilterOp::Range);
    assert!(FilterOp::parse("like").is_err());
}

#[test]
fn test_field_aliases() {
    assert_eq!(AccountField::parse("balance").unwrap(), AccountField::Balance);
    assert_eq!(AccountField::parse("AccountNumber").unwrap(), AccountField::Number);
    assert_eq!(AccountField::Type.column(), "AccountType");
}

// ── Dashboard helpers ─────────────────────────────────────────

#[test]
fn test_type_breakdown_totals() {
    let rows = type_breakdown(&sample());
    let savings = rows
        .iter()
        .find(|r| r.account_type == AccountType::Savings)
        .unwrap();
    assert_eq!(savings.count, 3);
    assert_eq!(savings.total_balance, dec!(6951.00));
    let sum: Decimal = rows.iter().map(|r| r.total_balance).sum();
    assert_eq!(sum, dec!(214008.25));
}

#[test]
fn test_top_by_balance() {
    let top = top_by_balance(&sample(), 5);
    assert_eq!(
        numbers(&top),
        vec!["ACC-10004", "ACC-10003", "ACC-10009", "ACC-10010", "ACC-10002"]
    );
    assert_eq!(top_by_balance(&sample(), 50).len(), 10);
}

#[test]
fn test_top_by_balance_stable_on_ties() {
    let accounts = vec![
        make_account(1, "A", dec!(10), "Checking"),
        make_account(2, "B", dec!(20), "Checking"),
        make_account(3, "C", dec!(10), "Checking"),
    ];
    assert_eq!(numbers(&top_by_balance(&accounts, 3)), vec!["B", "A", "C"]);
}

#[test]
fn test_balance_distribution() {
    let d = balance_distribution(&sample()).unwrap();
    assert_eq!(d.min, dec!(325.80));
    assert_eq!(d.q1, dec!(962.5));
    assert_eq!(d.median, dec!(3875.625));
    assert_eq!(d.q3, dec!(13750));
    assert_eq!(d.max, dec!(103230.95));
}

#[test]
fn test_balance_distribution_single_and_empty() {
    let one = vec![make_account(1, "A", dec!(42.00), "Checking")];
    let d = balance_distribution(&one).unwrap();
    assert_eq!(d.min, dec!(42));
    assert_eq!(d.median, dec!(42));
    assert_eq!(d.max, dec!(42));
    assert!(balance_distribution(&[]).is_none());
}

#[test]
fn test_balance_comparison() {
    let accounts = sample();
    let c = balance_comparison(by_number(&accounts, "ACC-10008"), &accounts);
    assert_eq!(c.balance, dec!(950.00));
    assert_eq!(c.type_average, dec!(2317));
    assert_eq!(c.overall_average, dec!(21400.825));
    assert!((c.percentile - 1.0 / 3.0).abs() < 1e-9);
}
