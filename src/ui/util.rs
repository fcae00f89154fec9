use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::models::Value;

/// Money display: `1234567.891` becomes `"$1,234,567.89"`, negatives `"-$42.50"`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let cents = val
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let rounded = format!("{cents:.2}");
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, "00"));
    let sign = if val < Decimal::ZERO && !cents.is_zero() { "-" } else { "" };
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",")
}

/// A 0..=1 fraction as a percentage with one decimal.
pub(crate) fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Render an ad-hoc query cell. Numeric values in balance-like columns are
/// shown as money; everything else uses the value's own display.
pub(crate) fn format_cell(column: &str, value: &Value) -> String {
    if !column.to_ascii_lowercase().contains("balance") {
        return value.to_string();
    }
    let amount = match value {
        Value::Integer(i) => Some(Decimal::from(*i)),
        Value::Real(r) => Decimal::try_from(*r).ok(),
        Value::Text(t) => Decimal::from_str(t.trim()).ok(),
        Value::Null | Value::Blob(_) => None,
    };
    amount.map_or_else(|| value.to_string(), format_amount)
}

/// Truncate to at most `max` characters, the last being "…" when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max - 1).collect();
    format!("{kept}…")
}

pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}
