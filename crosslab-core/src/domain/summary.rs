//! The persisted result of one run.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EquityPoint, Fill};
use crate::metrics;

/// Summary statistics of a single backtest run.
///
/// Field order is the serialized order, so two identical runs produce
/// byte-identical JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub observations: usize,
    pub total_return: f64,
    pub sharpe_annualized: f64,
    pub win_rate: f64,
    pub final_equity: f64,
    pub start: Option<String>,
    pub end: Option<String>,
    pub max_drawdown: f64,
    pub trade_count: usize,
}

impl BacktestSummary {
    /// Degenerate summary for a run with no usable observations.
    pub fn empty(initial_capital: f64) -> Self {
        Self {
            observations: 0,
            total_return: 0.0,
            sharpe_annualized: 0.0,
            win_rate: 0.0,
            final_equity: initial_capital,
            start: None,
            end: None,
            max_drawdown: 0.0,
            trade_count: 0,
        }
    }

    /// Compute all statistics from a finished run.
    pub fn from_run(equity_curve: &[EquityPoint], fills: &[Fill], initial_capital: f64) -> Self {
        if equity_curve.is_empty() {
            return Self::empty(initial_capital);
        }
        let values: Vec<f64> = equity_curve.iter().map(|p| p.value).collect();
        let returns = metrics::per_bar_returns(&values);
        let final_equity = values[values.len() - 1];

        Self {
            observations: equity_curve.len(),
            total_return: metrics::total_return(&values, initial_capital),
            sharpe_annualized: metrics::sharpe_annualized(&returns),
            win_rate: metrics::win_rate(&returns),
            final_equity,
            start: equity_curve.first().and_then(|p| p.timestamp).map(iso),
            end: equity_curve.last().and_then(|p| p.timestamp).map(iso),
            max_drawdown: metrics::max_drawdown(&values),
            trade_count: fills.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
