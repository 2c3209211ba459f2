// =============================================================================
// Shared types used across the market analysis service
// =============================================================================

use serde::Serialize;

/// A single daily observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    /// ISO date key as it appeared in the payload (e.g. "2024-01-15").
    pub date: String,
    pub close: f64,
}

/// Chronologically ordered close series, ascending by date, no duplicates.
///
/// Built only through [`crate::engine::series::build_price_series`]; the
/// points are not mutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub(crate) fn from_sorted(points: Vec<PricePoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        Self { points }
    }

    #[cfg(test)]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Most recent `count` points (oldest first).
    pub fn tail(&self, count: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(count);
        &self.points[start..]
    }
}

/// Output of one analysis request.
///
/// NaN fields serialise as JSON `null`.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorResult {
    /// Upper-cased ticker symbol.
    pub ticker: String,
    #[serde(rename = "ma50")]
    pub ma_short: f64,
    #[serde(rename = "ma200")]
    pub ma_long: f64,
    pub volatility: f64,
    pub rsi: f64,
}
