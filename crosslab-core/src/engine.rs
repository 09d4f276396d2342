//! Engine facade: conditioning, simulation and statistics in one call.
//!
//! A pure function of (rows, signal source, parameters). Nothing is shared
//! between calls, so independent runs can execute on any number of threads.

use serde::{Deserialize, Serialize};

use crate::conditioner::{condition, ConditioningReport, SignalSource};
use crate::domain::{BacktestSummary, EquityPoint, Fill, RawRow};
use crate::error::EngineError;
use crate::observer::SimulationObserver;
use crate::simulator::{simulate, SimulationParams};

/// Everything one engine run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    pub summary: BacktestSummary,
    pub equity_curve: Vec<EquityPoint>,
    pub fills: Vec<Fill>,
    pub report: ConditioningReport,
}

impl EngineOutput {
    /// True when conditioning left no observations to simulate.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }
}

/// Run the full pipeline on raw rows.
///
/// Parameters are validated before any row is touched. An empty
/// conditioned series is not an error: it yields
/// [`BacktestSummary::empty`].
pub fn run_engine(
    rows: &[RawRow],
    source: &SignalSource,
    params: &SimulationParams,
    observer: &mut dyn SimulationObserver,
) -> Result<EngineOutput, EngineError> {
    source.validate()?;
    params.validate()?;

    let conditioned = condition(rows, source)?;
    observer.on_conditioned(&conditioned.report);

    if conditioned.series.is_empty() {
        let summary = BacktestSummary::empty(params.initial_capital);
        observer.on_complete(&summary);
        return Ok(EngineOutput {
            summary,
            equity_curve: Vec::new(),
            fills: Vec::new(),
            report: conditioned.report,
        });
    }

    let result = simulate(&conditioned.series, params, observer)?;
    let summary =
        BacktestSummary::from_run(&result.equity_curve, &result.fills, params.initial_capital);
    observer.on_complete(&summary);

    Ok(EngineOutput {
        summary,
        equity_curve: result.equity_curve,
        fills: result.fills,
        report: conditioned.report,
    })
}
