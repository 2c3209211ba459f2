// =============================================================================
// Series Builder — RawSeries -> PriceSeries
// =============================================================================
//
// Parses the close field of every record and orders the points by date key.
// ISO dates sort lexicographically in chronological order, so no date
// parsing is needed. Cardinality is preserved: no dedup, no aggregation.
// =============================================================================

use serde_json::Value;

use crate::engine::normalizer::{json_kind, RawSeries};
use crate::error::AnalysisError;
use crate::types::{PricePoint, PriceSeries};

/// Close-price field in Alpha Vantage daily records.
pub const CLOSE_FIELD: &str = "4. close";

/// Build an ascending [`PriceSeries`] from a resolved raw series.
pub fn build_price_series(raw: &RawSeries<'_>) -> Result<PriceSeries, AnalysisError> {
    let mut points = Vec::with_capacity(raw.len());

    for (date, record) in raw.records {
        let close = parse_close(date, record)?;
        points.push(PricePoint {
            date: date.clone(),
            close,
        });
    }

    // Map keys are unique, so the order is strict.
    points.sort_by(|a, b| a.date.cmp(&b.date));

    Ok(PriceSeries::from_sorted(points))
}

fn parse_close(date: &str, record: &Value) -> Result<f64, AnalysisError> {
    let fields = record.as_object().ok_or_else(|| {
        AnalysisError::invalid(format!(
            "record for {date} must be an object, got {}",
            json_kind(record)
        ))
    })?;

    let field = fields
        .get(CLOSE_FIELD)
        .ok_or_else(|| AnalysisError::invalid(format!("record for {date} is missing '{CLOSE_FIELD}'")))?;

    let close = match field {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match close {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(AnalysisError::invalid(format!(
            "'{CLOSE_FIELD}' for {date} is not a finite number: {field}"
        ))),
    }
}
