//! Simple Moving Average (SMA).
//!
//! Rolling mean over a trailing window. The first defined value is at
//! index `window - 1`; earlier positions are `None`.

/// Trailing simple moving average of `prices`.
///
/// Prices reaching this point are already coerced to finite values, so
/// the window sum is rolled forward without NaN rescans.
pub fn sma(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = prices.len();
    let mut result = vec![None; n];
    if window == 0 || n < window {
        return result;
    }

    let mut sum: f64 = prices[..window].iter().sum();
    result[window - 1] = Some(sum / window as f64);

    for i in window..n {
        sum += prices[i] - prices[i - window];
        result[i] = Some(sum / window as f64);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: Option<f64>, expected: f64) {
        let v = actual.expect("expected a defined SMA value");
        assert!((v - expected).abs() < 1e-9, "expected {expected}, got {v}");
    }

    #[test]
    fn sma_5_basic() {
        let result = sma(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0], 5);
        assert_eq!(result.len(), 7);
        for (i, v) in result.iter().take(4).enumerate() {
            assert!(v.is_none(), "expected None at index {i}");
        }
        assert_approx(result[4], 12.0);
        assert_approx(result[5], 13.0);
        assert_approx(result[6], 14.0);
    }

    #[test]
    fn sma_1_is_price() {
        let result = sma(&[100.0, 200.0, 300.0], 1);
        assert_approx(result[0], 100.0);
        assert_approx(result[1], 200.0);
        assert_approx(result[2], 300.0);
    }

    #[test]
    fn sma_short_input_is_all_none() {
        assert!(sma(&[1.0, 2.0], 3).iter().all(Option::is_none));
        assert!(sma(&[], 3).is_empty());
    }
}
