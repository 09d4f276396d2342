//! Logging setup: console plus a per-run log file.
//!
//! Each process writes `run_YYYYMMDD-HHMMSS.log` under the configured log
//! directory. The level comes from `RUST_LOG` and defaults to `info`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log file under {dir}: {source}")]
    File {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("a global subscriber is already installed: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Name of the log file for a run started at `now`.
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("run_{}.log", now.format("%Y%m%d-%H%M%S"))
}

/// Create `log_dir` if needed and open a fresh log file inside it.
pub fn create_log_file(log_dir: &Path) -> Result<(File, PathBuf), LoggingError> {
    let err = |source| LoggingError::File {
        dir: log_dir.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(log_dir).map_err(err)?;
    let path = log_dir.join(log_file_name(Local::now()));
    let file = File::create(&path).map_err(err)?;
    Ok((file, path))
}

/// Install the global subscriber. Returns the log file path.
pub fn init(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    let (file, path) = create_log_file(log_dir)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    let logfile = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(logfile)
        .try_init()?;

    tracing::info!(path = %path.display(), "logger initialized");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_uses_compact_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(log_file_name(now), "run_20240309-070501.log");
    }

    #[test]
    fn create_log_file_makes_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        let (_file, path) = create_log_file(&log_dir).unwrap();
        assert!(path.exists());
        assert!(path.starts_with(&log_dir));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("run_") && name.ends_with(".log"));
    }
}
