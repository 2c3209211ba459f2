// =============================================================================
// Simple Moving Average (SMA) — trailing window, graceful degrade
// =============================================================================
//
// MA(W) = mean of the most recent W closes (inclusive of the final close).
//
// When fewer than W closes exist the mean of ALL available closes is
// returned instead. A short history is not an error.
// =============================================================================

use crate::error::IndicatorError;

/// Mean of the last `window` closes, or of every close when the series is
/// shorter than `window`.
///
/// # Edge cases
/// - empty `closes` or `window == 0` => NaN
/// - a sum that overflows to infinity => [`IndicatorError::NonFinite`]
pub fn moving_average(closes: &[f64], window: usize) -> Result<f64, IndicatorError> {
    if closes.is_empty() || window == 0 {
        return Ok(f64::NAN);
    }

    let start = closes.len().saturating_sub(window);
    let mean = mean(&closes[start..]);

    if mean.is_finite() {
        Ok(mean)
    } else {
        Err(IndicatorError::NonFinite {
            indicator: "moving average",
        })
    }
}

/// Arithmetic mean; NaN for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn ma_uses_trailing_window() {
        let closes = ramp(250);
        let ma50 = moving_average(&closes, 50).unwrap();
        let expected = closes[200..].iter().sum::<f64>() / 50.0;
        assert!((ma50 - expected).abs() < 1e-10);

        let ma200 = moving_average(&closes, 200).unwrap();
        let expected = closes[50..].iter().sum::<f64>() / 200.0;
        assert!((ma200 - expected).abs() < 1e-10);
    }

    #[test]
    fn ma_short_series_uses_all_points() {
        let closes = ramp(10);
        let all = closes.iter().sum::<f64>() / 10.0;
        assert!((moving_average(&closes, 50).unwrap() - all).abs() < 1e-10);
        assert!((moving_average(&closes, 200).unwrap() - all).abs() < 1e-10);
    }

    #[test]
    fn ma_exact_window_length() {
        let closes = ramp(50);
        let all = closes.iter().sum::<f64>() / 50.0;
        assert!((moving_average(&closes, 50).unwrap() - all).abs() < 1e-10);
    }

    #[test]
    fn ma_empty_is_nan() {
        assert!(moving_average(&[], 50).unwrap().is_nan());
    }

    #[test]
    fn ma_period_zero_is_nan() {
        assert!(moving_average(&[1.0, 2.0], 0).unwrap().is_nan());
    }

    #[test]
    fn ma_overflow_is_error() {
        let closes = vec![f64::MAX, f64::MAX];
        assert_eq!(
            moving_average(&closes, 2),
            Err(IndicatorError::NonFinite {
                indicator: "moving average"
            })
        );
    }
}
