// =============================================================================
// Relative Strength Index (RSI) — simple rolling means
// =============================================================================
//
// Step 1 — Price changes (deltas) from consecutive closes.
// Step 2 — gain = max(delta, 0), loss = max(-delta, 0).
// Step 3 — Rolling arithmetic mean of gain and loss over the trailing
//          `period` deltas (no Wilder smoothing).
// Step 4 — RS  = mean_gain / mean_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Only the value at the most recent close is reported, so only the last
// `period` deltas (the last `period + 1` closes) take part.
// =============================================================================

use crate::error::IndicatorError;
use crate::indicators::sma::mean;

/// RSI at the most recent close.
///
/// # Edge cases
/// - `period == 0`, `period == usize::MAX` or fewer than `period + 1` closes => NaN
/// - mean loss zero, mean gain positive => 100.0
/// - mean loss and mean gain both zero => NaN (flat window, RS is 0/0)
/// - a non-finite delta inside the window => [`IndicatorError::NonFinite`]
pub fn current_rsi(closes: &[f64], period: usize) -> Result<f64, IndicatorError> {
    let needed = match period.checked_add(1) {
        Some(n) if period > 0 && closes.len() >= n => n,
        _ => return Ok(f64::NAN),
    };

    let window = &closes[closes.len() - needed..];
    let deltas: Vec<f64> = window.windows(2).map(|w| w[1] - w[0]).collect();

    if deltas.iter().any(|d| !d.is_finite()) {
        return Err(IndicatorError::NonFinite { indicator: "RSI" });
    }

    let gains: Vec<f64> = deltas.iter().map(|&d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|&d| (-d).max(0.0)).collect();

    Ok(rsi_from_averages(mean(&gains), mean(&losses)))
}

/// Convert mean gain / mean loss into an RSI value in [0, 100].
///
/// The zero-loss branches are explicit: IEEE propagation would give
/// 100 for `x / 0.0` but NaN for `0.0 / 0.0`, and only the first is wanted.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        // No movement at all; momentum is undefined.
        f64::NAN
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
