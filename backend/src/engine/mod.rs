// =============================================================================
// Indicator Engine — payload -> IndicatorResult
// =============================================================================
//
// Pipeline for one request:
//   1. normalize:  locate the date-keyed series in the payload
//   2. series:     parse closes, order by date
//   3. indicators: MA(short), MA(long), volatility, RSI at the last close
//
// The engine holds only its window parameters and no shared state, so any
// number of requests may run it concurrently.
// =============================================================================

pub mod normalizer;
pub mod series;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{AnalysisError, IndicatorError};
use crate::indicators::{rsi, sma, volatility};
use crate::runtime_config::IndicatorParams;
use crate::types::{IndicatorResult, PriceSeries};

use self::normalizer::normalize;
use self::series::build_price_series;

/// Stateless indicator calculator configured with its look-back windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    /// Run the full pipeline for `ticker` over a loosely-shaped `payload`.
    ///
    /// Malformed input yields [`AnalysisError::InvalidInput`]; any numerical
    /// failure while computing yields [`AnalysisError::AnalysisFailed`].
    /// Both are logged with the ticker and the payload's top-level keys.
    pub fn analyze(&self, ticker: &str, payload: &Value) -> Result<IndicatorResult, AnalysisError> {
        let outcome = self.run(ticker, payload);

        match &outcome {
            Ok(_) => {}
            Err(e @ AnalysisError::InvalidInput(_)) => {
                warn!(
                    ticker,
                    payload_keys = ?top_level_keys(payload),
                    error = %e,
                    "rejected analysis payload"
                );
            }
            Err(e @ AnalysisError::AnalysisFailed(_)) => {
                error!(
                    ticker,
                    payload_keys = ?top_level_keys(payload),
                    error = %e,
                    "analysis failed"
                );
            }
        }

        outcome
    }

    fn run(&self, ticker: &str, payload: &Value) -> Result<IndicatorResult, AnalysisError> {
        let raw = normalize(payload)?;
        let series = build_price_series(&raw)?;

        debug!(
            ticker,
            source = %raw.source,
            points = series.len(),
            "price series built"
        );

        Ok(self.compute(ticker, &series)?)
    }

    /// Compute all indicators over an already-normalized series.
    pub fn compute(&self, ticker: &str, series: &PriceSeries) -> Result<IndicatorResult, IndicatorError> {
        let closes = series.closes();
        let p = &self.params;

        Ok(IndicatorResult {
            ticker: ticker.to_uppercase(),
            ma_short: sma::moving_average(&closes, p.ma_short_window)?,
            ma_long: sma::moving_average(&closes, p.ma_long_window)?,
            volatility: volatility::current_volatility(&closes, p.volatility_window)?,
            rsi: rsi::current_rsi(&closes, p.rsi_period)?,
        })
    }
}

/// Analyze with the default windows (50 / 200 / 30 / 14).
#[allow(dead_code)]
pub fn analyze(ticker: &str, payload: &Value) -> Result<IndicatorResult, AnalysisError> {
    IndicatorEngine::default().analyze(ticker, payload)
}

fn top_level_keys(payload: &Value) -> Vec<&str> {
    match payload.as_object() {
        Some(obj) => obj.keys().map(String::as_str).collect(),
        None => vec!["<not an object>"],
    }
}
