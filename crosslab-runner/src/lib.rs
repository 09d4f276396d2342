//! CrossLab Runner: configuration, data loading, orchestration, export.
//!
//! This crate builds on `crosslab-core` to provide:
//! - TOML configuration with defaults and validation
//! - CSV price loading and calendar-date window filtering
//! - Single-backtest runner that writes the JSON summary report
//! - CSV export of equity curve, fills and crossover features
//! - Parallel moving-average window sweeps
//! - Console and per-run file logging

pub mod config;
pub mod data_loader;
pub mod export;
pub mod logging;
pub mod runner;
pub mod sweep;

pub use config::{AppConfig, BacktestSettings, ConfigError, DataPaths, FeatureConfig, IoConfig};
pub use data_loader::{filter_date_window, read_rows, rows_from_reader, LoadError};
pub use runner::{
    export_features, load_configured_rows, run_backtest, run_backtest_from_rows, BacktestRun,
    RunError,
};
pub use sweep::{run_sweep, ParamGrid, SweepEntry, SweepResults};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: sweep inputs and results cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<AppConfig>();
        require_sync::<AppConfig>();
        require_send::<SweepResults>();
        require_sync::<SweepResults>();
        require_send::<BacktestRun>();
        require_send::<RunError>();
    }
}
