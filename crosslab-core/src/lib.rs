//! CrossLab Core: signal conditioning, long/flat simulation, statistics.
//!
//! This crate contains the whole simulation engine and no I/O:
//! - Domain types (raw rows, conditioned bars, fills, equity points, summary)
//! - Signal Conditioner (column discovery, coercion, ordering, SMA crossover)
//! - Position Simulator (cash/units state machine with proportional costs)
//! - Statistics (total return, annualized Sharpe, win rate, drawdown)
//! - Observer hook for diagnostics at defined checkpoints

pub mod conditioner;
pub mod domain;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod simulator;

pub use conditioner::{condition, Conditioned, ConditioningReport, SignalSource};
pub use domain::{
    BacktestSummary, ConditionedBar, ConditionedSeries, EquityPoint, Fill, FillSide, RawRow,
    RawValue, Signal,
};
pub use engine::{run_engine, EngineOutput};
pub use error::EngineError;
pub use observer::{NoopObserver, RecordingObserver, SimulationObserver, TracingObserver};
pub use simulator::{simulate, CostModel, SimulationParams, SimulationResult};
