#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;
use crate::models::Value;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
    assert_eq!(format_amount(dec!(103230.95)), "$103,230.95");
    assert_eq!(format_amount(dec!(214008.25)), "$214,008.25");
}

#[test]
fn test_format_amount_small() {
    assert_eq!(format_amount(dec!(325.8)), "$325.80");
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(5)), "$5.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-$42.50");
    assert_eq!(format_amount(dec!(-99999.01)), "-$99,999.01");
}

#[test]
fn test_format_amount_average_rounds() {
    assert_eq!(format_amount(dec!(21400.825)), "$21,400.83");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(10000000)), "$10,000,000.00");
}

// ── format_percent / format_cell ──────────────────────────────

#[test]
fn test_format_percent() {
    assert_eq!(format_percent(1.0 / 3.0), "33.3%");
    assert_eq!(format_percent(0.0), "0.0%");
}

#[test]
fn test_format_cell_balance_columns() {
    assert_eq!(format_cell("Balance", &Value::Real(2500.5)), "$2,500.50");
    assert_eq!(format_cell("TotalBalance", &Value::Integer(6951)), "$6,951.00");
    assert_eq!(
        format_cell("CAST(Balance AS TEXT)", &Value::Text("950.0".into())),
        "$950.00"
    );
}

#[test]
fn test_format_cell_other_columns() {
    assert_eq!(format_cell("AccountID", &Value::Integer(7)), "7");
    assert_eq!(format_cell("Balance", &Value::Null), "");
    assert_eq!(format_cell("Balance", &Value::Text("n/a".into())), "n/a");
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_fits() {
    assert_eq!(truncate("ACC-10001", 9), "ACC-10001");
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_cuts_with_ellipsis() {
    assert_eq!(truncate("Retirement", 6), "Retir…");
    assert_eq!(truncate("hello", 1), "…");
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_follows_cursor() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (9, 7);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (9, 7));
}

#[test]
fn test_scroll_up_pulls_view() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_bottom() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));

    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 0, 4);
    assert_eq!((index, scroll), (0, 0));
}
