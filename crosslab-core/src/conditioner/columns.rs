//! Column discovery and cell coercion.
//!
//! Field names are matched case-insensitively after trimming. The first
//! name in each priority list that any row carries wins.

use std::collections::BTreeSet;

use crate::domain::{RawRow, RawValue};

/// Recognized timestamp-like fields, highest priority first.
pub const TIMESTAMP_FIELDS: &[&str] = &["time", "date", "timestamp", "datetime", "ts"];

/// Recognized price-like fields, highest priority first.
pub const PRICE_FIELDS: &[&str] = &["close", "price", "feature", "value"];

/// Explicit signal field.
pub const SIGNAL_FIELD: &str = "signal";

/// Actual key names present across all rows.
fn present_keys(rows: &[RawRow]) -> BTreeSet<&str> {
    rows.iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect()
}

/// Resolve the first candidate present in `rows`, returning the key as
/// spelled in the input.
fn find_field(rows: &[RawRow], candidates: &[&str]) -> Option<String> {
    let keys = present_keys(rows);
    candidates.iter().find_map(|candidate| {
        keys.iter()
            .find(|k| k.trim().eq_ignore_ascii_case(candidate))
            .map(|k| k.to_string())
    })
}

pub fn find_timestamp_field(rows: &[RawRow]) -> Option<String> {
    find_field(rows, TIMESTAMP_FIELDS)
}

pub fn find_price_field(rows: &[RawRow]) -> Option<String> {
    find_field(rows, PRICE_FIELDS)
}

pub fn find_signal_field(rows: &[RawRow]) -> Option<String> {
    find_field(rows, &[SIGNAL_FIELD])
}

/// Price cell to a finite, strictly positive number; anything else is missing.
pub fn coerce_price(value: &RawValue) -> Option<f64> {
    value.as_f64().filter(|p| p.is_finite() && *p > 0.0)
}

/// Signal cell to `-1`, `0` or `1`.
///
/// Unparseable and NaN cells become 0. Values are clamped to `[-1, 1]`
/// and truncated toward zero, so `0.7` is 0 and `5` is 1.
pub fn clamp_signal(value: &RawValue) -> i8 {
    match value.as_f64() {
        Some(v) if !v.is_nan() => v.clamp(-1.0, 1.0).trunc() as i8,
        _ => 0,
    }
}
