//! Backtest runner: wires configuration, data loading, engine and export.
//!
//! Two entry points:
//! - `run_backtest()`: loads the configured price file, runs, writes the report. Used by CLI.
//! - `run_backtest_from_rows()`: takes pre-loaded rows, no I/O. Used by sweeps and tests.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crosslab_core::conditioner::crossover_features;
use crosslab_core::{
    run_engine, BacktestSummary, EngineError, EngineOutput, RawRow, SignalSource,
    SimulationParams, TracingObserver,
};

use crate::config::{AppConfig, ConfigError};
use crate::data_loader::{filter_date_window, read_rows, LoadError};
use crate::export;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("failed to export {path}: {message}")]
    Export { path: PathBuf, message: String },
}

/// Result of one configured run, with where its artifacts went.
#[derive(Debug, Clone)]
pub struct BacktestRun {
    pub symbol: String,
    pub source: SignalSource,
    pub output: EngineOutput,
    pub report_path: PathBuf,
    pub equity_path: Option<PathBuf>,
    pub trades_path: Option<PathBuf>,
}

impl BacktestRun {
    pub fn summary(&self) -> &BacktestSummary {
        &self.output.summary
    }
}

fn export_err(path: &std::path::Path, err: anyhow::Error) -> RunError {
    RunError::Export {
        path: path.to_path_buf(),
        message: format!("{err:#}"),
    }
}

/// Load the configured rows, restricted to the date window.
pub fn load_configured_rows(config: &AppConfig) -> Result<Vec<RawRow>, RunError> {
    let path = config.prices_path();
    info!(path = %path.display(), "loading prices");
    let rows = read_rows(&path)?;
    Ok(filter_date_window(
        rows,
        config.start_date()?,
        config.end_date()?,
    ))
}

/// Run a single backtest from an [`AppConfig`] and write its report.
///
/// Configuration is validated before the price file is opened. The report
/// at `io.report_path` is overwritten.
pub fn run_backtest(config: &AppConfig) -> Result<BacktestRun, RunError> {
    config.validate()?;
    let params = config.simulation_params()?;
    let rows = load_configured_rows(config)?;
    let source = SignalSource::detect(&rows, config.features.sma_short, config.features.sma_long)?;
    info!(symbol = %config.backtest.symbol, ?source, rows = rows.len(), "running backtest");

    let output = run_backtest_from_rows(&rows, &source, &params, &config.backtest.symbol)?;

    let report_path = config.io.report_path.clone();
    export::write_report(&output.summary, &report_path).map_err(|e| export_err(&report_path, e))?;
    info!(path = %report_path.display(), "wrote summary report");

    if let Some(path) = &config.io.equity_path {
        export::equity_csv(&output.equity_curve)
            .and_then(|csv| export::write_text(path, &csv))
            .map_err(|e| export_err(path, e))?;
        info!(path = %path.display(), "wrote equity curve");
    }
    if let Some(path) = &config.io.trades_path {
        export::fills_csv(&output.fills)
            .and_then(|csv| export::write_text(path, &csv))
            .map_err(|e| export_err(path, e))?;
        info!(path = %path.display(), "wrote fill tape");
    }

    Ok(BacktestRun {
        symbol: config.backtest.symbol.clone(),
        source,
        output,
        report_path,
        equity_path: config.io.equity_path.clone(),
        trades_path: config.io.trades_path.clone(),
    })
}

/// Run a backtest on pre-loaded rows. No I/O.
pub fn run_backtest_from_rows(
    rows: &[RawRow],
    source: &SignalSource,
    params: &SimulationParams,
    label: &str,
) -> Result<EngineOutput, RunError> {
    let mut observer = TracingObserver::new(label);
    Ok(run_engine(rows, source, params, &mut observer)?)
}

/// Compute the crossover feature table for the configured data and write
/// it to `features.csv` under the features directory. Returns the path
/// and the number of rows written.
pub fn export_features(config: &AppConfig) -> Result<(PathBuf, usize), RunError> {
    config.validate()?;
    let rows = load_configured_rows(config)?;
    let features = crossover_features(&rows, config.features.sma_short, config.features.sma_long)?;

    let path = config.features_path();
    export::features_csv(&features)
        .and_then(|csv| export::write_text(&path, &csv))
        .map_err(|e| export_err(&path, e))?;
    info!(path = %path.display(), rows = features.len(), "wrote feature table");
    Ok((path, features.len()))
}
