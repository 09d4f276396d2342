//! Price file loading and date-window filtering.
//!
//! Rows are read from a headed CSV into [`RawRow`] maps with every cell
//! kept as text; coercion is the conditioner's job. Empty cells become
//! [`RawValue::Null`].

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crosslab_core::conditioner::columns::find_timestamp_field;
use crosslab_core::conditioner::timestamp::parse_timestamp;
use crosslab_core::{RawRow, RawValue};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("price file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Read every row of the CSV at `path`.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = rows_from_reader(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = rows.len(), "loaded price rows");
    Ok(rows)
}

/// Parse headed CSV from any reader. Short records are allowed; missing
/// trailing cells are simply absent from the row.
pub fn rows_from_reader<R: Read>(reader: R) -> Result<Vec<RawRow>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| {
                let value = if cell.is_empty() {
                    RawValue::Null
                } else {
                    RawValue::Text(cell.to_string())
                };
                (name.to_string(), value)
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Keep rows whose calendar date falls in `[start, end]` (both inclusive,
/// either bound optional).
///
/// Rows whose timestamp cannot be parsed are kept so the conditioner can
/// drop and count them. Without a timestamp column nothing can be
/// filtered and every row passes through.
pub fn filter_date_window(
    rows: Vec<RawRow>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<RawRow> {
    if start.is_none() && end.is_none() {
        return rows;
    }
    let Some(field) = find_timestamp_field(&rows) else {
        warn!("no timestamp column; date window ignored");
        return rows;
    };

    let before = rows.len();
    let kept: Vec<RawRow> = rows
        .into_iter()
        .filter(|row| {
            let date = row
                .get(&field)
                .and_then(RawValue::as_text)
                .and_then(|text| parse_timestamp(&text))
                .map(|ts| ts.date_naive());
            match date {
                Some(d) => start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e),
                None => true,
            }
        })
        .collect();
    debug!(before, after = kept.len(), "applied date window");
    kept
}
