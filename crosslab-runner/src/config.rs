//! TOML configuration with nested sections and validation on load.
//!
//! ```toml
//! [data_paths]
//! raw = "data/raw"
//!
//! [features]
//! sma_short = 10
//! sma_long = 30
//!
//! [backtest]
//! symbol = "SPY"
//! fee_bps = 1.0
//!
//! [io]
//! report_path = "reports/backtest_summary.json"
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crosslab_core::conditioner::{DEFAULT_FAST, DEFAULT_SLOW};
use crosslab_core::{CostModel, SignalSource, SimulationParams};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_paths: DataPaths,
    #[serde(default)]
    pub features: FeatureConfig,
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub io: IoConfig,
}

/// Data directories. The price file lives under `raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub raw: PathBuf,
    pub staging: PathBuf,
    pub features: PathBuf,
    pub prices_file: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            raw: PathBuf::from("data/raw"),
            staging: PathBuf::from("data/staging"),
            features: PathBuf::from("data/features"),
            prices_file: "prices_sample.csv".into(),
        }
    }
}

/// Moving-average windows for the derived crossover signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub sma_short: usize,
    pub sma_long: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sma_short: DEFAULT_FAST,
            sma_long: DEFAULT_SLOW,
        }
    }
}

/// Account, cost and date-window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSettings {
    pub symbol: String,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default)]
    pub fee_bps: f64,
    #[serde(default)]
    pub slippage_bps: f64,
    /// Bars between a signal and the bar that trades on it.
    #[serde(default)]
    pub signal_lag: usize,
    /// Inclusive first calendar date (`YYYY-MM-DD`).
    #[serde(default)]
    pub start: Option<String>,
    /// Inclusive last calendar date (`YYYY-MM-DD`).
    #[serde(default)]
    pub end: Option<String>,
}

fn default_initial_capital() -> f64 {
    100_000.0
}

/// Output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    pub report_path: PathBuf,
    pub equity_path: Option<PathBuf>,
    pub trades_path: Option<PathBuf>,
    pub log_dir: PathBuf,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("reports/backtest_summary.json"),
            equity_path: None,
            trades_path: None,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter relationships. Runs before any data is read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("backtest.symbol must not be empty".into()));
        }
        self.signal_source()?;
        self.simulation_params()?;

        let start = self.start_date()?;
        let end = self.end_date()?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ConfigError::Invalid(format!(
                    "backtest.start ({s}) must not be after backtest.end ({e})"
                )));
            }
        }
        Ok(())
    }

    /// Crossover source built from the `[features]` windows.
    pub fn signal_source(&self) -> Result<SignalSource, ConfigError> {
        SignalSource::derived(self.features.sma_short, self.features.sma_long)
            .map_err(|e| ConfigError::Invalid(format!("features: {e}")))
    }

    pub fn simulation_params(&self) -> Result<SimulationParams, ConfigError> {
        let bt = &self.backtest;
        CostModel::new(bt.fee_bps, bt.slippage_bps)
            .and_then(|costs| SimulationParams::new(bt.initial_capital, costs))
            .map(|params| params.with_signal_lag(bt.signal_lag))
            .map_err(|e| ConfigError::Invalid(format!("backtest: {e}")))
    }

    pub fn start_date(&self) -> Result<Option<NaiveDate>, ConfigError> {
        parse_date("backtest.start", self.backtest.start.as_deref())
    }

    pub fn end_date(&self) -> Result<Option<NaiveDate>, ConfigError> {
        parse_date("backtest.end", self.backtest.end.as_deref())
    }

    /// Full path of the input price CSV.
    pub fn prices_path(&self) -> PathBuf {
        self.data_paths.raw.join(&self.data_paths.prices_file)
    }

    /// Full path of the exported feature table.
    pub fn features_path(&self) -> PathBuf {
        self.data_paths.features.join("features.csv")
    }
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ConfigError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| {
                ConfigError::Invalid(format!("{field} '{s}' is not a YYYY-MM-DD date: {e}"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[backtest]
symbol = "SPY"
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = AppConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(cfg.features.sma_short, 10);
        assert_eq!(cfg.features.sma_long, 30);
        assert_eq!(cfg.backtest.initial_capital, 100_000.0);
        assert_eq!(cfg.backtest.fee_bps, 0.0);
        assert_eq!(cfg.backtest.signal_lag, 0);
        assert_eq!(
            cfg.io.report_path,
            PathBuf::from("reports/backtest_summary.json")
        );
        assert_eq!(
            cfg.prices_path(),
            PathBuf::from("data/raw").join("prices_sample.csv")
        );
        assert!(cfg.features.sma_long > cfg.features.sma_short);
    }

    #[test]
    fn full_config_round_trips() {
        let toml_str = r#"
[data_paths]
raw = "in"
staging = "stage"
features = "feat"
prices_file = "spy.csv"

[features]
sma_short = 5
sma_long = 20

[backtest]
symbol = "QQQ"
initial_capital = 5000.0
fee_bps = 2.5
slippage_bps = 1.0
signal_lag = 1
start = "2020-01-01"
end = "2020-12-31"

[io]
report_path = "out/report.json"
equity_path = "out/equity.csv"
log_dir = "out/logs"
"#;
        let cfg = AppConfig::from_toml(toml_str).unwrap();
        assert_eq!(cfg.prices_path(), PathBuf::from("in").join("spy.csv"));
        assert_eq!(cfg.start_date().unwrap(), NaiveDate::from_ymd_opt(2020, 1, 1));
        let params = cfg.simulation_params().unwrap();
        assert!((params.costs.rate() - 3.5 / 10_000.0).abs() < 1e-15);
        assert_eq!(params.signal_lag, 1);

        let back = toml::to_string(&cfg).unwrap();
        assert_eq!(AppConfig::from_toml(&back).unwrap(), cfg);
    }

    #[test]
    fn long_window_must_exceed_short() {
        let toml_str = r#"
[features]
sma_short = 30
sma_long = 30

[backtest]
symbol = "SPY"
"#;
        let err = AppConfig::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn negative_fee_rejected() {
        let toml_str = r#"
[backtest]
symbol = "SPY"
fee_bps = -1.0
"#;
        assert!(matches!(
            AppConfig::from_toml(toml_str),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn non_positive_capital_rejected() {
        let toml_str = r#"
[backtest]
symbol = "SPY"
initial_capital = 0.0
"#;
        assert!(matches!(
            AppConfig::from_toml(toml_str),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn reversed_date_window_rejected() {
        let toml_str = r#"
[backtest]
symbol = "SPY"
start = "2021-01-01"
end = "2020-01-01"
"#;
        assert!(matches!(
            AppConfig::from_toml(toml_str),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_date_rejected() {
        let toml_str = r#"
[backtest]
symbol = "SPY"
start = "01/02/2020"
"#;
        assert!(matches!(
            AppConfig::from_toml(toml_str),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_backtest_section_is_a_parse_error() {
        assert!(matches!(
            AppConfig::from_toml("[features]\nsma_short = 3\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::from_file(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
