//! Conditioned series and the equity curve built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Signal;

/// One aligned observation: the price and the signal from the same source row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionedBar {
    pub timestamp: Option<DateTime<Utc>>,
    pub price: f64,
    pub signal: Signal,
}

impl ConditionedBar {
    pub fn new(timestamp: Option<DateTime<Utc>>, price: f64, signal: Signal) -> Self {
        Self {
            timestamp,
            price,
            signal,
        }
    }
}

/// Time-ordered `(price, signal)` sequence ready for simulation.
///
/// Prices and signals are stored together per bar, so the two views
/// returned by [`prices`](Self::prices) and [`signals`](Self::signals)
/// always have the same length and index alignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionedSeries {
    bars: Vec<ConditionedBar>,
}

impl ConditionedSeries {
    pub fn new(bars: Vec<ConditionedBar>) -> Self {
        Self { bars }
    }

    /// Build an untimed series from parallel price and signal slices.
    ///
    /// Returns `None` when the slices differ in length.
    pub fn from_parallel(prices: &[f64], signals: &[Signal]) -> Option<Self> {
        if prices.len() != signals.len() {
            return None;
        }
        let bars = prices
            .iter()
            .zip(signals)
            .map(|(&price, &signal)| ConditionedBar::new(None, price, signal))
            .collect();
        Some(Self { bars })
    }

    pub fn bars(&self) -> &[ConditionedBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.price).collect()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.bars.iter().map(|b| b.signal).collect()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.bars.first().and_then(|b| b.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.bars.last().and_then(|b| b.timestamp)
    }
}

/// Account value after processing one bar: `cash + units * price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub bar_index: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub value: f64,
}
