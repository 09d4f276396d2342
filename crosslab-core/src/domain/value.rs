//! Raw input cells as they arrive from ingestion.
//!
//! Rows are field-name keyed maps. CSV readers produce `Text` for every
//! non-empty cell; JSON sources may carry real numbers. Nothing here is
//! validated: coercion happens in the conditioner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One input row: field name to raw cell value.
pub type RawRow = BTreeMap<String, RawValue>;

/// A single untyped input cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl RawValue {
    /// Numeric view of the cell. Text is trimmed and parsed; `Null` and
    /// unparseable text yield `None`. The result may be non-finite.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(v) => Some(*v),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Null => None,
        }
    }

    /// Textual view of the cell, used for timestamp parsing.
    ///
    /// Integral numbers render without a fractional part so an epoch
    /// column stored as numbers parses the same as its text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(v) if v.is_finite() && v.fract() == 0.0 => {
                Some(format!("{}", *v as i64))
            }
            RawValue::Number(v) => Some(v.to_string()),
            RawValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_parses_as_number() {
        assert_eq!(RawValue::from(" 101.5 ").as_f64(), Some(101.5));
        assert_eq!(RawValue::from("abc").as_f64(), None);
        assert_eq!(RawValue::Null.as_f64(), None);
    }

    #[test]
    fn integral_number_renders_without_fraction() {
        assert_eq!(RawValue::Number(1_600_000_000.0).as_text().as_deref(), Some("1600000000"));
        assert_eq!(RawValue::Number(1.5).as_text().as_deref(), Some("1.5"));
    }

    #[test]
    fn untagged_deserialization_accepts_mixed_rows() {
        let row: RawRow =
            serde_json::from_str(r#"{"date": "2020-01-02", "close": 101.0, "signal": null}"#)
                .unwrap();
        assert_eq!(row["date"], RawValue::Text("2020-01-02".into()));
        assert_eq!(row["close"], RawValue::Number(101.0));
        assert!(row["signal"].is_null());
    }
}
