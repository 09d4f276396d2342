//! Performance statistics: pure functions over the equity curve.
//!
//! No dependencies on the conditioner or simulator. Everything returns a
//! finite number for degenerate input instead of NaN.

/// Bars per year used to annualize the Sharpe ratio.
pub const BARS_PER_YEAR: f64 = 252.0;

/// Added to the standard deviation so zero-variance returns divide safely.
pub const SHARPE_EPSILON: f64 = 1e-12;

// ─── Metric functions ───────────────────────────────────────────────

/// Total return relative to the starting capital: `final / initial - 1`.
pub fn total_return(equity_curve: &[f64], initial_capital: f64) -> f64 {
    match equity_curve.last() {
        Some(&last) if initial_capital > 0.0 => last / initial_capital - 1.0,
        _ => 0.0,
    }
}

/// Annualized Sharpe ratio from per-bar returns, no risk-free rate.
///
/// `mean / (std + ε) * sqrt(252)` with the population standard deviation.
/// Empty returns give 0.0.
pub fn sharpe_annualized(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mean = mean(returns);
    let std = std_dev(returns);
    (mean / (std + SHARPE_EPSILON)) * BARS_PER_YEAR.sqrt()
}

/// Fraction of bars with a strictly positive return.
pub fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let winners = returns.iter().filter(|&&r| r > 0.0).count();
    winners as f64 / returns.len() as f64
}

/// Maximum drawdown as a negative fraction (e.g., -0.15 = 15% drawdown).
///
/// Returns 0.0 if equity is constant or monotonically increasing.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &eq in equity_curve {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Simple per-bar returns `(e[i] - e[i-1]) / e[i-1]`.
///
/// Empty for fewer than two points. A non-positive previous value yields a
/// 0.0 return rather than an infinity.
pub fn per_bar_returns(equity_curve: &[f64]) -> Vec<f64> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 {
                (w[1] - w[0]) / w[0]
            } else {
                0.0
            }
        })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
