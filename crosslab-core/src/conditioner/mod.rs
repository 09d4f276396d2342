//! Signal Conditioner: raw rows in, a clean time-ordered `(price, signal)`
//! sequence out.
//!
//! Pipeline per call:
//! 1. Resolve the timestamp, price and (for explicit sources) signal fields
//! 2. Drop rows whose timestamp or price cannot be coerced
//! 3. Stable-sort by UTC timestamp
//! 4. Attach signals: clamp the explicit column, or derive the SMA crossover
//!    and drop the warm-up rows where either average is undefined

pub mod columns;
pub mod sma;
pub mod timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ConditionedBar, ConditionedSeries, RawRow, Signal};
use crate::error::EngineError;

pub use columns::{
    clamp_signal, coerce_price, find_price_field, find_signal_field, find_timestamp_field,
    PRICE_FIELDS, SIGNAL_FIELD, TIMESTAMP_FIELDS,
};
pub use sma::sma;
pub use timestamp::parse_timestamp;

/// Default fast SMA window.
pub const DEFAULT_FAST: usize = 10;
/// Default slow SMA window.
pub const DEFAULT_SLOW: usize = 30;

/// Where the per-bar signal comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalSource {
    /// Use the input's `signal` column, clamped to `{-1, 0, 1}`.
    Explicit,
    /// Long iff SMA(fast) > SMA(slow), computed over price.
    Derived { fast: usize, slow: usize },
}

impl SignalSource {
    /// Validated crossover source: `fast >= 1` and `slow > fast`.
    pub fn derived(fast: usize, slow: usize) -> Result<Self, EngineError> {
        let source = SignalSource::Derived { fast, slow };
        source.validate()?;
        Ok(source)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        match *self {
            SignalSource::Explicit => Ok(()),
            SignalSource::Derived { fast, slow } => {
                if fast < 1 {
                    return Err(EngineError::Configuration(format!(
                        "fast window must be >= 1, got {fast}"
                    )));
                }
                if slow <= fast {
                    return Err(EngineError::Configuration(format!(
                        "slow window ({slow}) must be greater than fast window ({fast})"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Pick the source at the ingestion boundary: explicit when the rows
    /// carry a `signal` field, otherwise the validated crossover.
    pub fn detect(rows: &[RawRow], fast: usize, slow: usize) -> Result<Self, EngineError> {
        if find_signal_field(rows).is_some() {
            Ok(SignalSource::Explicit)
        } else {
            SignalSource::derived(fast, slow)
        }
    }

    /// Observations consumed before the first usable signal.
    pub fn warmup_bars(&self) -> usize {
        match *self {
            SignalSource::Explicit => 0,
            SignalSource::Derived { slow, .. } => slow.saturating_sub(1),
        }
    }
}

/// Row accounting for one conditioning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditioningReport {
    pub rows_in: usize,
    pub dropped_timestamp: usize,
    pub dropped_price: usize,
    pub dropped_warmup: usize,
    pub rows_out: usize,
    pub timestamp_field: Option<String>,
    pub price_field: Option<String>,
}

/// Conditioner output: the series plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditioned {
    pub series: ConditionedSeries,
    pub report: ConditioningReport,
}

/// One bar of the crossover feature table, warm-up rows included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub timestamp: Option<DateTime<Utc>>,
    pub price: f64,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    /// `None` until both averages are defined.
    pub signal: Option<Signal>,
}

/// Row that survived timestamp and price coercion.
#[derive(Debug, Clone)]
struct PreparedRow {
    timestamp: Option<DateTime<Utc>>,
    price: f64,
    explicit_signal: Option<i8>,
}

/// Condition `rows` into an aligned series.
pub fn condition(rows: &[RawRow], source: &SignalSource) -> Result<Conditioned, EngineError> {
    source.validate()?;
    let (prepared, mut report) = prepare(rows, source)?;

    let bars: Vec<ConditionedBar> = match *source {
        SignalSource::Explicit => prepared
            .iter()
            .map(|row| {
                let signal = Signal::from_clamped(row.explicit_signal.unwrap_or(0));
                ConditionedBar::new(row.timestamp, row.price, signal)
            })
            .collect(),
        SignalSource::Derived { fast, slow } => {
            let features = features_from_prepared(&prepared, fast, slow);
            let total = features.len();
            let bars: Vec<ConditionedBar> = features
                .into_iter()
                .filter_map(|f| f.signal.map(|s| ConditionedBar::new(f.timestamp, f.price, s)))
                .collect();
            report.dropped_warmup = total - bars.len();
            bars
        }
    };

    report.rows_out = bars.len();
    Ok(Conditioned {
        series: ConditionedSeries::new(bars),
        report,
    })
}

/// Crossover feature table for `rows`, warm-up rows included.
///
/// Used for feature export; [`condition`] with a derived source keeps only
/// the rows whose `signal` is defined.
pub fn crossover_features(
    rows: &[RawRow],
    fast: usize,
    slow: usize,
) -> Result<Vec<FeatureRow>, EngineError> {
    let source = SignalSource::derived(fast, slow)?;
    let (prepared, _) = prepare(rows, &source)?;
    Ok(features_from_prepared(&prepared, fast, slow))
}

fn features_from_prepared(prepared: &[PreparedRow], fast: usize, slow: usize) -> Vec<FeatureRow> {
    let prices: Vec<f64> = prepared.iter().map(|r| r.price).collect();
    let fast_ma = sma(&prices, fast);
    let slow_ma = sma(&prices, slow);

    prepared
        .iter()
        .zip(fast_ma.into_iter().zip(slow_ma))
        .map(|(row, (f, s))| {
            let signal = match (f, s) {
                (Some(f), Some(s)) => Some(if f > s { Signal::Long } else { Signal::Flat }),
                _ => None,
            };
            FeatureRow {
                timestamp: row.timestamp,
                price: row.price,
                sma_fast: f,
                sma_slow: s,
                signal,
            }
        })
        .collect()
}

/// Column resolution, coercion and ordering shared by every source.
fn prepare(
    rows: &[RawRow],
    source: &SignalSource,
) -> Result<(Vec<PreparedRow>, ConditioningReport), EngineError> {
    let mut report = ConditioningReport {
        rows_in: rows.len(),
        ..ConditioningReport::default()
    };
    if rows.is_empty() {
        return Ok((Vec::new(), report));
    }

    let price_field =
        find_price_field(rows).ok_or_else(|| EngineError::MissingColumn("price".into()))?;
    let signal_field = match source {
        SignalSource::Explicit => Some(
            find_signal_field(rows).ok_or_else(|| EngineError::MissingColumn(SIGNAL_FIELD.into()))?,
        ),
        SignalSource::Derived { .. } => None,
    };
    let timestamp_field = find_timestamp_field(rows);

    let mut prepared = Vec::with_capacity(rows.len());
    for row in rows {
        let timestamp = match &timestamp_field {
            Some(field) => {
                match row
                    .get(field)
                    .and_then(|v| v.as_text())
                    .and_then(|s| parse_timestamp(&s))
                {
                    Some(ts) => Some(ts),
                    None => {
                        report.dropped_timestamp += 1;
                        continue;
                    }
                }
            }
            None => None,
        };

        let Some(price) = row.get(&price_field).and_then(coerce_price) else {
            report.dropped_price += 1;
            continue;
        };

        let explicit_signal = signal_field
            .as_ref()
            .map(|field| row.get(field).map(clamp_signal).unwrap_or(0));

        prepared.push(PreparedRow {
            timestamp,
            price,
            explicit_signal,
        });
    }

    // Stable: equal timestamps, and untimed series, keep input order.
    prepared.sort_by_key(|r| r.timestamp);

    report.timestamp_field = timestamp_field;
    report.price_field = Some(price_field);
    Ok((prepared, report))
}
