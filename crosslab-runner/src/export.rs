//! Report and artifact export: summary JSON plus CSV tables.
//!
//! - **JSON**: the run summary, the file downstream tooling reads
//! - **CSV**: equity curve, fill tape and the crossover feature table
//!
//! Writing a file replaces any previous content at that path.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use crosslab_core::conditioner::FeatureRow;
use crosslab_core::{BacktestSummary, EquityPoint, Fill, FillSide};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a summary to pretty JSON.
pub fn summary_json(summary: &BacktestSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize BacktestSummary to JSON")
}

/// Parse a summary previously written by [`summary_json`]. Floats come
/// back bit-for-bit.
pub fn import_summary_json(json: &str) -> Result<BacktestSummary> {
    serde_json::from_str(json).context("failed to deserialize BacktestSummary from JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

fn format_ts(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn format_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: bar_index, timestamp, equity
pub fn equity_csv(curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["bar_index", "timestamp", "equity"])?;
    for p in curve {
        wtr.write_record([
            p.bar_index.to_string(),
            format_ts(p.timestamp),
            format!("{:.6}", p.value),
        ])?;
    }
    finish(wtr)
}

/// Columns: bar_index, timestamp, side, price, units, notional, fee
pub fn fills_csv(fills: &[Fill]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "bar_index",
        "timestamp",
        "side",
        "price",
        "units",
        "notional",
        "fee",
    ])?;
    for f in fills {
        let side = match f.side {
            FillSide::Buy => "buy",
            FillSide::Sell => "sell",
        };
        wtr.write_record([
            f.bar_index.to_string(),
            format_ts(f.timestamp),
            side.to_string(),
            format!("{:.6}", f.price),
            format!("{:.6}", f.units),
            format!("{:.6}", f.notional),
            format!("{:.6}", f.fee),
        ])?;
    }
    finish(wtr)
}

/// Columns: timestamp, price, sma_fast, sma_slow, signal
///
/// Averages and signal are blank during warm-up.
pub fn features_csv(rows: &[FeatureRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "price", "sma_fast", "sma_slow", "signal"])?;
    for r in rows {
        wtr.write_record([
            format_ts(r.timestamp),
            format!("{:.6}", r.price),
            format_opt(r.sma_fast),
            format_opt(r.sma_slow),
            r.signal.map(|s| s.as_i8().to_string()).unwrap_or_default(),
        ])?;
    }
    finish(wtr)
}

// ─── File output ────────────────────────────────────────────────────

/// Write `contents` to `path`, creating parent directories.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Write the summary JSON report to `path`.
pub fn write_report(summary: &BacktestSummary, path: &Path) -> Result<()> {
    write_text(path, &summary_json(summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary() -> BacktestSummary {
        BacktestSummary {
            observations: 3,
            total_return: 0.05,
            sharpe_annualized: 1.25,
            win_rate: 0.5,
            final_equity: 105_000.0,
            start: Some("2020-01-01T00:00:00Z".into()),
            end: Some("2020-01-03T00:00:00Z".into()),
            max_drawdown: 0.01,
            trade_count: 1,
        }
    }

    #[test]
    fn summary_json_has_report_keys() {
        let json = summary_json(&summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in [
            "observations",
            "total_return",
            "sharpe_annualized",
            "win_rate",
            "final_equity",
            "start",
            "end",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["observations"], 3);
    }

    #[test]
    fn summary_json_imports_back() {
        let json = summary_json(&summary()).unwrap();
        assert_eq!(import_summary_json(&json).unwrap(), summary());
    }

    #[test]
    fn import_restores_floats_exactly() {
        let s = BacktestSummary {
            total_return: 110_000.0 / 100_000.0 - 1.0,
            sharpe_annualized: 0.1 + 0.2,
            win_rate: 1.0 / 3.0,
            final_equity: 104_761.904_761_904_77,
            max_drawdown: -0.047_619_047_619_047_67,
            ..summary()
        };
        let back = import_summary_json(&summary_json(&s).unwrap()).unwrap();
        assert_eq!(back.total_return.to_bits(), s.total_return.to_bits());
        assert_eq!(back.sharpe_annualized.to_bits(), s.sharpe_annualized.to_bits());
        assert_eq!(back, s);
    }

    #[test]
    fn import_rejects_garbage() {
        assert!(import_summary_json("{not json").is_err());
    }

    #[test]
    fn equity_csv_layout() {
        let ts = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
        let curve = vec![
            EquityPoint {
                bar_index: 0,
                timestamp: Some(ts),
                value: 100_000.0,
            },
            EquityPoint {
                bar_index: 1,
                timestamp: None,
                value: 100_500.25,
            },
        ];
        let csv = equity_csv(&curve).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "bar_index,timestamp,equity");
        assert_eq!(lines[1], "0,2020-01-02T00:00:00Z,100000.000000");
        assert_eq!(lines[2], "1,,100500.250000");
    }

    #[test]
    fn fills_csv_layout() {
        let fills = vec![Fill {
            bar_index: 4,
            timestamp: None,
            side: FillSide::Sell,
            price: 110.0,
            units: 2.0,
            notional: 220.0,
            fee: 0.22,
        }];
        let csv = fills_csv(&fills).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "4,,sell,110.000000,2.000000,220.000000,0.220000"
        );
    }

    #[test]
    fn features_csv_blanks_warmup() {
        let rows = vec![
            FeatureRow {
                timestamp: None,
                price: 10.0,
                sma_fast: Some(10.0),
                sma_slow: None,
                signal: None,
            },
            FeatureRow {
                timestamp: None,
                price: 12.0,
                sma_fast: Some(12.0),
                sma_slow: Some(11.0),
                signal: Some(crosslab_core::Signal::Long),
            },
        ];
        let csv = features_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], ",10.000000,10.000000,,");
        assert_eq!(lines[2], ",12.000000,12.000000,11.000000,1");
    }

    #[test]
    fn write_report_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("nested").join("summary.json");

        write_report(&BacktestSummary::empty(1.0), &path).unwrap();
        write_report(&summary(), &path).unwrap();

        let back = import_summary_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, summary());
    }
}
