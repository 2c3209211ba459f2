// =============================================================================
// Payload Normalizer — locate the date-keyed series inside a loose payload
// =============================================================================
//
// Alpha Vantage daily responses nest the series one level down under a
// wrapper key; callers may also post the bare series. Resolution order:
//
//   1. "Time Series (Daily)"
//   2. "Time Series (Daily Adjusted)"
//   3. the payload itself
// =============================================================================

use serde_json::{Map, Value};

use crate::error::AnalysisError;

pub const DAILY_KEY: &str = "Time Series (Daily)";
pub const DAILY_ADJUSTED_KEY: &str = "Time Series (Daily Adjusted)";

/// Where the series was found in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSource {
    Daily,
    DailyAdjusted,
    Flat,
}

impl std::fmt::Display for SeriesSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "{DAILY_KEY}"),
            Self::DailyAdjusted => write!(f, "{DAILY_ADJUSTED_KEY}"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// Unnormalized date -> record mapping, borrowed from the payload.
#[derive(Debug, Clone, Copy)]
pub struct RawSeries<'a> {
    pub source: SeriesSource,
    pub records: &'a Map<String, Value>,
}

impl RawSeries<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Pick the series out of `payload` without inspecting the records.
///
/// Returns `None` when the payload is not a JSON object.
pub fn resolve_source(payload: &Value) -> Option<(SeriesSource, &Value)> {
    let obj = payload.as_object()?;
    if let Some(inner) = obj.get(DAILY_KEY) {
        Some((SeriesSource::Daily, inner))
    } else if let Some(inner) = obj.get(DAILY_ADJUSTED_KEY) {
        Some((SeriesSource::DailyAdjusted, inner))
    } else {
        Some((SeriesSource::Flat, payload))
    }
}

/// Resolve the payload into a non-empty [`RawSeries`].
pub fn normalize(payload: &Value) -> Result<RawSeries<'_>, AnalysisError> {
    let (source, inner) = resolve_source(payload)
        .ok_or_else(|| AnalysisError::invalid("daily payload must be a JSON object"))?;

    let records = match inner {
        Value::Object(map) if !map.is_empty() => map,
        Value::Object(_) | Value::Null => {
            return Err(AnalysisError::invalid(
                "Invalid or empty daily time series data",
            ))
        }
        other => {
            return Err(AnalysisError::invalid(format!(
                "series under '{source}' must be an object, got {}",
                json_kind(other)
            )))
        }
    };

    Ok(RawSeries { source, records })
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
