//! Position Simulator: deterministic long/flat replay of a conditioned series.
//!
//! One pass, one observation at a time. Each bar:
//! 1. Validate the price (strictly positive and finite)
//! 2. Read the signal, delayed by `signal_lag` bars
//! 3. Apply at most one transition, charging the cost rate on the leg
//! 4. Append `cash + units * price` to the equity curve, transition or not

pub mod costs;
pub mod state;

use serde::{Deserialize, Serialize};

use crate::domain::{ConditionedSeries, EquityPoint, Fill, Signal};
use crate::error::EngineError;
use crate::observer::SimulationObserver;

pub use costs::{CostModel, SimulationParams};
pub use state::{Execution, PositionState, SimulationState};

/// Equity curve and executed legs of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub equity_curve: Vec<EquityPoint>,
    pub fills: Vec<Fill>,
}

impl SimulationResult {
    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|p| p.value).collect()
    }
}

/// Replay `series` against a fresh account.
///
/// Fails fast with [`EngineError::InvalidPrice`] on a non-positive or
/// non-finite price; the account is never touched by such a bar.
pub fn simulate(
    series: &ConditionedSeries,
    params: &SimulationParams,
    observer: &mut dyn SimulationObserver,
) -> Result<SimulationResult, EngineError> {
    params.validate()?;
    let fee_rate = params.costs.rate();
    let bars = series.bars();

    let mut state = SimulationState::new(params.initial_capital);
    let mut equity_curve = Vec::with_capacity(bars.len());
    let mut fills = Vec::new();

    for (bar_index, bar) in bars.iter().enumerate() {
        if !bar.price.is_finite() || bar.price <= 0.0 {
            return Err(EngineError::InvalidPrice {
                bar_index,
                price: bar.price,
            });
        }

        let target = if bar_index >= params.signal_lag {
            bars[bar_index - params.signal_lag].signal
        } else {
            Signal::Flat
        };

        if let Some(exec) = state.step(target, bar.price, fee_rate) {
            let fill = Fill {
                bar_index,
                timestamp: bar.timestamp,
                side: exec.side,
                price: bar.price,
                units: exec.units,
                notional: exec.notional,
                fee: exec.fee,
            };
            observer.on_fill(&fill, state.cash());
            fills.push(fill);
        }

        equity_curve.push(EquityPoint {
            bar_index,
            timestamp: bar.timestamp,
            value: state.equity(bar.price),
        });
    }

    Ok(SimulationResult {
        equity_curve,
        fills,
    })
}
