//! Single-run account state and the long/flat transition rules.

use crate::domain::{FillSide, Signal};

/// Account exposure: `Flat` holds no units, `Long` holds all capital in units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

/// Outcome of a transition, before it is stamped with bar metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Execution {
    pub side: FillSide,
    pub units: f64,
    pub notional: f64,
    pub fee: f64,
}

/// Cash and units for exactly one simulation run.
///
/// `position_units` is 0 when flat, or the positive quantity bought at the
/// most recent entry when long. It is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    cash: f64,
    position_units: f64,
}

impl SimulationState {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            position_units: 0.0,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position_units(&self) -> f64 {
        self.position_units
    }

    pub fn position_state(&self) -> PositionState {
        if self.position_units > 0.0 {
            PositionState::Long
        } else {
            PositionState::Flat
        }
    }

    /// Mark-to-market value at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.position_units * price
    }

    /// Apply at most one transition for `target` at `price`.
    ///
    /// `Flat + Long` buys with all cash, `Long + Flat` sells everything;
    /// the other two combinations are no-ops and charge nothing. An entry
    /// is skipped when cash is not positive, since it would open a short.
    pub fn step(&mut self, target: Signal, price: f64, fee_rate: f64) -> Option<Execution> {
        match (self.position_state(), target) {
            (PositionState::Flat, Signal::Long) if self.cash > 0.0 => {
                Some(self.enter_long(price, fee_rate))
            }
            (PositionState::Long, Signal::Flat) => Some(self.exit_long(price, fee_rate)),
            _ => None,
        }
    }

    fn enter_long(&mut self, price: f64, fee_rate: f64) -> Execution {
        let units = self.cash / price;
        let notional = units * price;
        let fee = notional * fee_rate;
        // The whole principal buys units; what remains is minus the fee.
        self.cash = self.cash - notional - fee;
        self.position_units = units;
        Execution {
            side: FillSide::Buy,
            units,
            notional,
            fee,
        }
    }

    fn exit_long(&mut self, price: f64, fee_rate: f64) -> Execution {
        let units = self.position_units;
        let proceeds = units * price;
        let fee = proceeds * fee_rate;
        self.cash += proceeds;
        self.cash -= fee;
        self.position_units = 0.0;
        Execution {
            side: FillSide::Sell,
            units,
            notional: proceeds,
            fee,
        }
    }
}
