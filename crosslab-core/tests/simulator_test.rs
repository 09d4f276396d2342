//! Engine behaviour on hand-built series: baselines, round trips, costs.

use crosslab_core::metrics::{per_bar_returns, sharpe_annualized};
use crosslab_core::{
    simulate, BacktestSummary, ConditionedSeries, CostModel, EngineError, FillSide, NoopObserver,
    Signal, SimulationParams,
};

const CAPITAL: f64 = 100_000.0;
const ROUND_TRIP_PRICES: [f64; 5] = [100.0, 105.0, 95.0, 110.0, 100.0];
const ROUND_TRIP_SIGNALS: [i8; 5] = [0, 1, 1, 0, 0];

fn series(prices: &[f64], signals: &[i8]) -> ConditionedSeries {
    let signals: Vec<Signal> = signals.iter().map(|&s| Signal::from_clamped(s)).collect();
    ConditionedSeries::from_parallel(prices, &signals).unwrap()
}

fn params(fee_bps: f64) -> SimulationParams {
    SimulationParams::new(CAPITAL, CostModel::new(fee_bps, 0.0).unwrap()).unwrap()
}

fn summarize(prices: &[f64], signals: &[i8], p: &SimulationParams) -> BacktestSummary {
    let result = simulate(&series(prices, signals), p, &mut NoopObserver).unwrap();
    BacktestSummary::from_run(&result.equity_curve, &result.fills, p.initial_capital)
}

// ── No-trade baseline ────────────────────────────────────────────────

#[test]
fn constant_flat_signal_keeps_equity_at_capital() {
    let prices = [100.0, 101.0, 99.0, 120.0, 80.0, 100.0];
    let signals = [0; 6];
    let result = simulate(&series(&prices, &signals), &params(25.0), &mut NoopObserver).unwrap();

    assert!(result.fills.is_empty());
    assert_eq!(result.equity_curve.len(), prices.len());
    for point in &result.equity_curve {
        assert_eq!(point.value, CAPITAL);
    }

    let summary = BacktestSummary::from_run(&result.equity_curve, &result.fills, CAPITAL);
    assert_eq!(summary.total_return, 0.0);
    assert_eq!(summary.sharpe_annualized, 0.0);
    assert_eq!(summary.win_rate, 0.0);
    assert_eq!(summary.trade_count, 0);
}

// ── Single round trip ────────────────────────────────────────────────

#[test]
fn single_round_trip_without_fees() {
    let result = simulate(
        &series(&ROUND_TRIP_PRICES, &ROUND_TRIP_SIGNALS),
        &params(0.0),
        &mut NoopObserver,
    )
    .unwrap();

    assert_eq!(result.fills.len(), 2);
    let buy = &result.fills[0];
    assert_eq!(buy.side, FillSide::Buy);
    assert_eq!(buy.bar_index, 1);
    assert_eq!(buy.price, 105.0);
    assert!((buy.units - CAPITAL / 105.0).abs() < 1e-12);

    let sell = &result.fills[1];
    assert_eq!(sell.side, FillSide::Sell);
    assert_eq!(sell.bar_index, 3);
    assert_eq!(sell.price, 110.0);

    let summary = BacktestSummary::from_run(&result.equity_curve, &result.fills, CAPITAL);
    let expected = 110.0 / 105.0 - 1.0;
    assert!((summary.total_return - expected).abs() < 1e-12);
    assert!((summary.total_return - 0.047619).abs() < 1e-6);
    assert_eq!(summary.observations, 5);
    assert_eq!(summary.trade_count, 2);
}

#[test]
fn equity_curve_marks_position_every_bar() {
    let result = simulate(
        &series(&ROUND_TRIP_PRICES, &ROUND_TRIP_SIGNALS),
        &params(0.0),
        &mut NoopObserver,
    )
    .unwrap();
    let units = CAPITAL / 105.0;
    let expected = [
        CAPITAL,
        units * 105.0,
        units * 95.0,
        units * 110.0,
        units * 110.0,
    ];
    for (point, want) in result.equity_curve.iter().zip(expected) {
        assert!((point.value - want).abs() < 1e-6, "bar {}", point.bar_index);
    }
}

// ── Fee erosion ──────────────────────────────────────────────────────

#[test]
fn fees_reduce_return_by_exactly_both_legs() {
    let free = summarize(&ROUND_TRIP_PRICES, &ROUND_TRIP_SIGNALS, &params(0.0));
    let costly = summarize(&ROUND_TRIP_PRICES, &ROUND_TRIP_SIGNALS, &params(100.0));
    assert!(costly.total_return < free.total_return);

    let rate = 0.01;
    let units = CAPITAL / 105.0;
    let entry_fee = units * 105.0 * rate;
    let exit_fee = units * 110.0 * rate;
    let expected_gap = (entry_fee + exit_fee) / CAPITAL;

    assert!((free.total_return - costly.total_return - expected_gap).abs() < 1e-12);
}

#[test]
fn slippage_costs_the_same_as_fee() {
    let fee_only = params(60.0);
    let split = SimulationParams::new(CAPITAL, CostModel::new(20.0, 40.0).unwrap()).unwrap();
    let a = summarize(&ROUND_TRIP_PRICES, &ROUND_TRIP_SIGNALS, &fee_only);
    let b = summarize(&ROUND_TRIP_PRICES, &ROUND_TRIP_SIGNALS, &split);
    assert!((a.final_equity - b.final_equity).abs() < 1e-9);
}

#[test]
fn cash_after_entry_is_minus_the_fee() {
    let result = simulate(&series(&[50.0], &[1]), &params(100.0), &mut NoopObserver).unwrap();
    let fill = &result.fills[0];
    assert!((fill.fee - CAPITAL * 0.01).abs() < 1e-9);
    // Equity = -fee + units * price
    assert!((result.equity_curve[0].value - (CAPITAL - fill.fee)).abs() < 1e-9);
}

// ── Transitions ──────────────────────────────────────────────────────

#[test]
fn at_most_one_transition_per_bar() {
    let prices = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
    let signals = [1, 0, 1, 0, 1, 0];
    let result = simulate(&series(&prices, &signals), &params(10.0), &mut NoopObserver).unwrap();
    assert_eq!(result.fills.len(), 6);
    let mut bars: Vec<usize> = result.fills.iter().map(|f| f.bar_index).collect();
    bars.dedup();
    assert_eq!(bars.len(), 6);
    for pair in result.fills.windows(2) {
        assert_ne!(pair[0].side, pair[1].side);
    }
}

#[test]
fn position_still_open_at_end_is_marked_not_closed() {
    let result = simulate(&series(&[100.0, 120.0], &[1, 1]), &params(0.0), &mut NoopObserver)
        .unwrap();
    assert_eq!(result.fills.len(), 1);
    let last = result.equity_curve.last().unwrap().value;
    assert!((last - CAPITAL * 1.2).abs() < 1e-6);
}

#[test]
fn empty_series_gives_empty_curve() {
    let result = simulate(&ConditionedSeries::default(), &params(0.0), &mut NoopObserver).unwrap();
    assert!(result.equity_curve.is_empty());
    let summary = BacktestSummary::from_run(&result.equity_curve, &result.fills, CAPITAL);
    assert_eq!(summary.total_return, 0.0);
    assert_eq!(summary.sharpe_annualized, 0.0);
}

#[test]
fn negative_price_is_a_contract_violation() {
    let err = simulate(&series(&[100.0, -5.0], &[0, 1]), &params(0.0), &mut NoopObserver)
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidPrice {
            bar_index: 1,
            price: -5.0
        }
    );
}

// ── Statistics on simulated curves ───────────────────────────────────

#[test]
fn sharpe_matches_per_bar_returns() {
    let result = simulate(
        &series(&ROUND_TRIP_PRICES, &ROUND_TRIP_SIGNALS),
        &params(0.0),
        &mut NoopObserver,
    )
    .unwrap();
    let values: Vec<f64> = result.equity_curve.iter().map(|p| p.value).collect();
    let returns = per_bar_returns(&values);
    assert_eq!(returns.len(), 4);
    let summary = BacktestSummary::from_run(&result.equity_curve, &result.fills, CAPITAL);
    assert_eq!(summary.sharpe_annualized, sharpe_annualized(&returns));
}

#[test]
fn win_rate_counts_positive_bars() {
    // 125 divides the capital exactly, so the entry bar has a zero return.
    let prices = [125.0, 125.0, 150.0, 100.0, 200.0];
    let signals = [1, 1, 1, 1, 1];
    let summary = summarize(&prices, &signals, &params(0.0));
    // Returns: 0, +20%, -33%, +100%.
    assert!((summary.win_rate - 0.5).abs() < 1e-12);
}

#[test]
fn summary_json_is_byte_identical_across_runs() {
    let p = params(15.0);
    let a = summarize(&ROUND_TRIP_PRICES, &ROUND_TRIP_SIGNALS, &p);
    let b = summarize(&ROUND_TRIP_PRICES, &ROUND_TRIP_SIGNALS, &p);
    assert_eq!(
        serde_json::to_string_pretty(&a).unwrap(),
        serde_json::to_string_pretty(&b).unwrap()
    );
}
