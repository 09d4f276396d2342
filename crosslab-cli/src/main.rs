//! CrossLab CLI: data layout, feature export, backtest and sweep commands.
//!
//! Commands:
//! - `ingest`: create the data directories and check the price file
//! - `features`: write the crossover feature table as CSV
//! - `backtest`: run the configured backtest and write the JSON report
//! - `sweep`: run a grid of window pairs and rank them by Sharpe

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crosslab_core::BacktestSummary;
use crosslab_runner::{
    export_features, load_configured_rows, logging, run_backtest, run_sweep, AppConfig,
    BacktestRun, ParamGrid, SweepResults,
};

#[derive(Parser)]
#[command(
    name = "crosslab",
    about = "CrossLab CLI: moving-average crossover backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configured data directories and check for the price file.
    Ingest {
        /// Path to a TOML config file.
        #[arg(long, default_value = "configs/default.toml")]
        config: PathBuf,
    },
    /// Compute SMA features and write features.csv.
    Features {
        /// Path to a TOML config file.
        #[arg(long, default_value = "configs/default.toml")]
        config: PathBuf,
    },
    /// Run the backtest and write the summary report.
    Backtest {
        /// Path to a TOML config file.
        #[arg(long, default_value = "configs/default.toml")]
        config: PathBuf,
    },
    /// Sweep fast/slow window pairs over the configured data.
    Sweep {
        /// Path to a TOML config file.
        #[arg(long, default_value = "configs/default.toml")]
        config: PathBuf,

        /// Fast windows, comma separated.
        #[arg(long, value_delimiter = ',', default_values_t = [5, 10, 20])]
        fast: Vec<usize>,

        /// Slow windows, comma separated.
        #[arg(long, value_delimiter = ',', default_values_t = [30, 50, 100])]
        slow: Vec<usize>,

        /// Run grid points one at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Number of rows to print.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { config } => run_ingest(&config),
        Commands::Features { config } => run_features(&config),
        Commands::Backtest { config } => run_backtest_cmd(&config),
        Commands::Sweep {
            config,
            fast,
            slow,
            sequential,
            top,
        } => run_sweep_cmd(&config, fast, slow, !sequential, top),
    }
}

/// Load the config and start logging into its log directory.
fn setup(config_path: &Path) -> Result<AppConfig> {
    let config = AppConfig::from_file(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    logging::init(&config.io.log_dir).context("failed to initialize logging")?;
    tracing::info!(config = %config_path.display(), "configuration loaded");
    Ok(config)
}

fn run_ingest(config_path: &Path) -> Result<()> {
    let config = setup(config_path)?;
    let paths = &config.data_paths;
    for dir in [&paths.raw, &paths.staging, &paths.features] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        tracing::info!(dir = %dir.display(), "data directory ready");
    }

    let prices = config.prices_path();
    if prices.exists() {
        println!("Price file present: {}", prices.display());
    } else {
        tracing::warn!(path = %prices.display(), "price file missing");
        println!("Place the price CSV at {}", prices.display());
    }
    Ok(())
}

fn run_features(config_path: &Path) -> Result<()> {
    let config = setup(config_path)?;
    let (path, rows) = export_features(&config)?;
    println!("Wrote {rows} feature rows to {}", path.display());
    Ok(())
}

fn run_backtest_cmd(config_path: &Path) -> Result<()> {
    let config = setup(config_path)?;
    let run = run_backtest(&config)?;
    print_summary(&run);
    Ok(())
}

fn run_sweep_cmd(
    config_path: &Path,
    fast: Vec<usize>,
    slow: Vec<usize>,
    parallel: bool,
    top: usize,
) -> Result<()> {
    let config = setup(config_path)?;
    let params = config.simulation_params()?;
    let rows = load_configured_rows(&config)?;
    let grid = ParamGrid {
        fast_windows: fast,
        slow_windows: slow,
    };
    tracing::info!(
        pairs = grid.combinations().len(),
        parallel,
        "starting sweep"
    );
    let results = run_sweep(&rows, &grid, &params, parallel)?;
    print_sweep(&config.backtest.symbol, &results, top);
    Ok(())
}

fn print_summary(run: &BacktestRun) {
    let s: &BacktestSummary = run.summary();
    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {}", run.symbol);
    println!(
        "Period:         {} to {}",
        s.start.as_deref().unwrap_or("-"),
        s.end.as_deref().unwrap_or("-")
    );
    println!("Observations:   {}", s.observations);
    println!(
        "Dropped rows:   {} timestamp, {} price, {} warmup",
        run.output.report.dropped_timestamp,
        run.output.report.dropped_price,
        run.output.report.dropped_warmup
    );
    println!("Fills:          {}", s.trade_count);
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", s.total_return * 100.0);
    println!("Sharpe:         {:.3}", s.sharpe_annualized);
    println!("Max Drawdown:   {:.2}%", s.max_drawdown * 100.0);
    println!("Win Rate:       {:.1}%", s.win_rate * 100.0);
    println!("Final Equity:   {:.2}", s.final_equity);
    println!();
    println!("Report written to {}", run.report_path.display());
    if s.observations == 0 {
        println!("WARNING: no usable observations");
    }
}

fn print_sweep(symbol: &str, results: &SweepResults, top: usize) {
    println!();
    println!("=== Sweep: {symbol} ({} runs) ===", results.len());
    println!(
        "{:>5} {:>5} {:>10} {:>8} {:>9} {:>6}",
        "fast", "slow", "return%", "sharpe", "maxdd%", "fills"
    );
    for e in results.sorted_by_sharpe().into_iter().take(top) {
        println!(
            "{:>5} {:>5} {:>10.2} {:>8.3} {:>9.2} {:>6}",
            e.fast,
            e.slow,
            e.summary.total_return * 100.0,
            e.summary.sharpe_annualized,
            e.summary.max_drawdown * 100.0,
            e.summary.trade_count
        );
    }
}
