//! Parameter sweep over moving-average window pairs.

use rayon::prelude::*;

use crosslab_core::{
    run_engine, BacktestSummary, NoopObserver, RawRow, SignalSource, SimulationParams,
};

use crate::runner::RunError;

/// Window grid to sweep. Pairs with `slow <= fast` are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGrid {
    pub fast_windows: Vec<usize>,
    pub slow_windows: Vec<usize>,
}

impl ParamGrid {
    /// Fast: 5, 10, 20. Slow: 30, 50, 100.
    pub fn ma_crossover_default() -> Self {
        Self {
            fast_windows: vec![5, 10, 20],
            slow_windows: vec![30, 50, 100],
        }
    }

    /// Number of raw pairs, before filtering.
    pub fn size(&self) -> usize {
        self.fast_windows.len() * self.slow_windows.len()
    }

    /// Valid `(fast, slow)` pairs in grid order.
    pub fn combinations(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for &fast in &self.fast_windows {
            for &slow in &self.slow_windows {
                // fast == 0 is left in and rejected by the engine
                if slow <= fast {
                    continue;
                }
                pairs.push((fast, slow));
            }
        }
        pairs
    }
}

/// One grid point and its result.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepEntry {
    pub fast: usize,
    pub slow: usize,
    pub summary: BacktestSummary,
}

/// Results from a parameter sweep, in grid order.
#[derive(Debug, Clone, Default)]
pub struct SweepResults {
    entries: Vec<SweepEntry>,
}

impl SweepResults {
    pub fn all(&self) -> &[SweepEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by annualized Sharpe, descending. Ties keep grid order.
    pub fn sorted_by_sharpe(&self) -> Vec<&SweepEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            b.summary
                .sharpe_annualized
                .partial_cmp(&a.summary.sharpe_annualized)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    pub fn best(&self) -> Option<&SweepEntry> {
        self.sorted_by_sharpe().into_iter().next()
    }
}

/// Run every valid pair of `grid` against the same rows.
///
/// Rows are always conditioned with the derived crossover, even if they
/// carry a `signal` column. The first failing pair aborts the sweep.
pub fn run_sweep(
    rows: &[RawRow],
    grid: &ParamGrid,
    params: &SimulationParams,
    parallel: bool,
) -> Result<SweepResults, RunError> {
    let pairs = grid.combinations();
    let run_one = |&(fast, slow): &(usize, usize)| -> Result<SweepEntry, RunError> {
        let source = SignalSource::derived(fast, slow)?;
        let output = run_engine(rows, &source, params, &mut NoopObserver)?;
        Ok(SweepEntry {
            fast,
            slow,
            summary: output.summary,
        })
    };

    let entries = if parallel {
        pairs.par_iter().map(run_one).collect::<Result<Vec<_>, _>>()?
    } else {
        pairs.iter().map(run_one).collect::<Result<Vec<_>, _>>()?
    };
    tracing::info!(runs = entries.len(), "sweep complete");
    Ok(SweepResults { entries })
}
