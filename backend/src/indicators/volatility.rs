// =============================================================================
// Rolling Volatility — sample std-dev of simple returns
// =============================================================================
//
//   r_t = close_t / close_{t-1} - 1
//   vol = stdev(r over the trailing `window` returns), N-1 denominator
//
// Only the value at the most recent close is produced, so only the last
// `window + 1` closes are read.
// =============================================================================

use crate::error::IndicatorError;
use crate::indicators::sma::mean;

/// Rolling volatility at the most recent close.
///
/// # Edge cases
/// - `window == 0`, `window == usize::MAX` or fewer than `window + 1` closes => NaN
/// - `window == 1` => NaN (sample std-dev of a single return is undefined)
/// - a zero close inside the window => [`IndicatorError::ZeroPrice`]
/// - overflow in the return or variance => [`IndicatorError::NonFinite`]
pub fn current_volatility(closes: &[f64], window: usize) -> Result<f64, IndicatorError> {
    let needed = match window.checked_add(1) {
        Some(n) if window > 0 && closes.len() >= n => n,
        _ => return Ok(f64::NAN),
    };

    let offset = closes.len() - needed;
    let returns = pct_returns(&closes[offset..], offset)?;
    let vol = sample_std(&returns);

    if vol.is_nan() || vol.is_finite() {
        Ok(vol)
    } else {
        Err(IndicatorError::NonFinite {
            indicator: "volatility",
        })
    }
}

/// Simple returns between consecutive closes. `offset` is the index of
/// `closes[0]` in the full series and is only used for error reporting.
fn pct_returns(closes: &[f64], offset: usize) -> Result<Vec<f64>, IndicatorError> {
    let mut returns = Vec::with_capacity(closes.len().saturating_sub(1));
    for (i, w) in closes.windows(2).enumerate() {
        if w[0] == 0.0 {
            return Err(IndicatorError::ZeroPrice { index: offset + i });
        }
        let r = w[1] / w[0] - 1.0;
        if !r.is_finite() {
            return Err(IndicatorError::NonFinite {
                indicator: "volatility",
            });
        }
        returns.push(r);
    }
    Ok(returns)
}

/// Sample standard deviation (N-1 denominator); NaN for fewer than 2 values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
