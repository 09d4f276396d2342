//! Transaction cost and run parameters.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

const BPS_PER_UNIT: f64 = 10_000.0;

/// Flat proportional cost charged on the notional of every trade leg.
///
/// Slippage is modelled as an extra fee: both are summed into one rate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostModel {
    pub fee_bps: f64,
    pub slippage_bps: f64,
}

impl CostModel {
    pub fn new(fee_bps: f64, slippage_bps: f64) -> Result<Self, EngineError> {
        let costs = Self {
            fee_bps,
            slippage_bps,
        };
        costs.validate()?;
        Ok(costs)
    }

    /// Frictionless costs.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [("fee_bps", self.fee_bps), ("slippage_bps", self.slippage_bps)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::Configuration(format!(
                    "{name} must be a finite value >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Combined cost as a fraction of notional.
    pub fn rate(&self) -> f64 {
        (self.fee_bps + self.slippage_bps) / BPS_PER_UNIT
    }
}

/// Everything the simulator needs besides the series itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub initial_capital: f64,
    pub costs: CostModel,
    /// Bars between a signal and the bar that acts on it.
    #[serde(default)]
    pub signal_lag: usize,
}

impl SimulationParams {
    pub fn new(initial_capital: f64, costs: CostModel) -> Result<Self, EngineError> {
        let params = Self {
            initial_capital,
            costs,
            signal_lag: 0,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_signal_lag(mut self, lag: usize) -> Self {
        self.signal_lag = lag;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(EngineError::Configuration(format!(
                "initial_capital must be > 0, got {}",
                self.initial_capital
            )));
        }
        self.costs.validate()
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            costs: CostModel::zero(),
            signal_lag: 0,
        }
    }
}
