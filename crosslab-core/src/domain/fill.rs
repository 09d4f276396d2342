//! Executed trade legs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillSide {
    Buy,
    Sell,
}

/// A whole-position entry or exit executed at the bar price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub bar_index: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub side: FillSide,
    pub price: f64,
    pub units: f64,
    /// `units * price` before costs.
    pub notional: f64,
    /// Cost deducted from cash for this leg.
    pub fee: f64,
}
