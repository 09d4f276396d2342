//! Diagnostic hook invoked by the engine at fixed checkpoints.
//!
//! The core never prints. Callers inject an observer to see conditioning
//! results, each executed leg and the final summary.

use crate::conditioner::ConditioningReport;
use crate::domain::{BacktestSummary, Fill};

/// Checkpoint callbacks. Every method defaults to a no-op.
pub trait SimulationObserver {
    /// After conditioning, before the first bar is simulated.
    fn on_conditioned(&mut self, _report: &ConditioningReport) {}

    /// After each state transition; `cash` is the balance after the leg.
    fn on_fill(&mut self, _fill: &Fill, _cash: f64) {}

    /// Once, after statistics are computed.
    fn on_complete(&mut self, _summary: &BacktestSummary) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SimulationObserver for NoopObserver {}

/// Observer that forwards checkpoints to `tracing`.
///
/// Conditioning and completion log at `info`, individual fills at `debug`.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl SimulationObserver for TracingObserver {
    fn on_conditioned(&mut self, report: &ConditioningReport) {
        tracing::info!(
            run = %self.label,
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            dropped_timestamp = report.dropped_timestamp,
            dropped_price = report.dropped_price,
            dropped_warmup = report.dropped_warmup,
            price_field = report.price_field.as_deref().unwrap_or("-"),
            "conditioned input series"
        );
    }

    fn on_fill(&mut self, fill: &Fill, cash: f64) {
        tracing::debug!(
            run = %self.label,
            bar = fill.bar_index,
            side = ?fill.side,
            price = fill.price,
            units = fill.units,
            fee = fill.fee,
            cash,
            "position transition"
        );
    }

    fn on_complete(&mut self, summary: &BacktestSummary) {
        tracing::info!(
            run = %self.label,
            observations = summary.observations,
            total_return = summary.total_return,
            sharpe = summary.sharpe_annualized,
            trades = summary.trade_count,
            "backtest complete"
        );
    }
}

/// Observer that keeps every checkpoint payload. Useful in tests and for
/// callers that want the trail without a logger.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub reports: Vec<ConditioningReport>,
    pub fills: Vec<(Fill, f64)>,
    pub summaries: Vec<BacktestSummary>,
}

impl SimulationObserver for RecordingObserver {
    fn on_conditioned(&mut self, report: &ConditioningReport) {
        self.reports.push(report.clone());
    }

    fn on_fill(&mut self, fill: &Fill, cash: f64) {
        self.fills.push((fill.clone(), cash));
    }

    fn on_complete(&mut self, summary: &BacktestSummary) {
        self.summaries.push(summary.clone());
    }
}
