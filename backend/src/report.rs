// =============================================================================
// Report Document — layout model for the one-page ticker report
// =============================================================================
//
// Sections, top to bottom:
//   1. Title        "AI-Generated Financial Report: <TICKER>"
//   2. Metrics      one line per analysis field, floats to two decimals
//   3. Price chart  the last `chart_days` closes, ascending
//
// A chart that cannot be built does not fail the report; the document
// carries the reason in place of the chart.
// =============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::engine::normalizer::normalize;
use crate::engine::series::build_price_series;
use crate::types::PricePoint;

/// Request body for the report endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportPayload {
    pub ticker: String,
    #[serde(default)]
    pub analysis: Map<String, Value>,
    #[serde(default)]
    pub daily: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub metrics_heading: &'static str,
    pub metrics: Vec<MetricLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<PriceChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_error: Option<String>,
}

/// Lay out the report for `payload`.
pub fn build_report(payload: &ReportPayload, chart_days: usize) -> ReportDocument {
    let ticker = payload.ticker.to_uppercase();

    let metrics = payload
        .analysis
        .iter()
        .map(|(key, value)| MetricLine {
            label: metric_label(key),
            value: format_metric(value),
        })
        .collect();

    let (chart, chart_error) = match build_chart(&payload.daily, chart_days) {
        Ok(chart) => (Some(chart), None),
        Err(reason) => {
            warn!(ticker = %ticker, error = %reason, "report chart skipped");
            (None, Some(format!("Could not generate chart: {reason}")))
        }
    };

    ReportDocument {
        title: format!("AI-Generated Financial Report: {ticker}"),
        metrics_heading: "Key Analysis Metrics",
        metrics,
        chart,
        chart_error,
    }
}

fn build_chart(daily: &Value, chart_days: usize) -> Result<PriceChart, String> {
    let raw = normalize(daily).map_err(|e| e.to_string())?;
    let series = build_price_series(&raw).map_err(|e| e.to_string())?;
    let points = series.tail(chart_days).to_vec();

    Ok(PriceChart {
        title: format!("Historical Close Price (Last {} Days)", points.len()),
        x_label: "Date",
        y_label: "Price (USD)",
        points,
    })
}

/// `"ma_long_window"` -> `"Ma Long Window"`.
fn metric_label(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn format_metric(value: &Value) -> String {
    match value {
        Value::Null => "n/a".to_string(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) => format!("{f:.2}"),
            None => n.to_string(),
        },
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn daily(n: usize) -> Value {
        let mut series = Map::new();
        for i in 0..n {
            series.insert(
                format!("2024-{:02}-{:02}", 1 + i / 28, 1 + i % 28),
                json!({ "4. close": format!("{}", 100 + i) }),
            );
        }
        json!({ "Time Series (Daily)": series })
    }

    fn payload(daily: Value) -> ReportPayload {
        ReportPayload {
            ticker: "goog".into(),
            analysis: json!({
                "ticker": "GOOG",
                "ma50": 123.456,
                "ma200": 120.0,
                "volatility": null,
                "rsi": 61.237,
            })
            .as_object()
            .cloned()
            .unwrap(),
            daily,
        }
    }

    #[test]
    fn title_and_metrics() {
        let doc = build_report(&payload(daily(5)), 100);
        assert_eq!(doc.title, "AI-Generated Financial Report: GOOG");

        let find = |label: &str| {
            doc.metrics
                .iter()
                .find(|m| m.label == label)
                .map(|m| m.value.clone())
        };
        assert_eq!(find("Ticker").as_deref(), Some("GOOG"));
        assert_eq!(find("Ma50").as_deref(), Some("123.46"));
        assert_eq!(find("Ma200").as_deref(), Some("120.00"));
        assert_eq!(find("Volatility").as_deref(), Some("n/a"));
        assert_eq!(find("Rsi").as_deref(), Some("61.24"));
    }

    #[test]
    fn chart_is_ascending_and_truncated() {
        let doc = build_report(&payload(daily(150)), 100);
        let chart = doc.chart.unwrap();
        assert!(doc.chart_error.is_none());
        assert_eq!(chart.points.len(), 100);
        assert_eq!(chart.title, "Historical Close Price (Last 100 Days)");
        assert!(chart.points.windows(2).all(|w| w[0].date < w[1].date));
        assert!((chart.points[99].close - 249.0).abs() < 1e-10);
    }

    #[test]
    fn bad_daily_keeps_report() {
        let doc = build_report(&payload(json!({})), 100);
        assert!(doc.chart.is_none());
        let reason = doc.chart_error.unwrap();
        assert!(reason.starts_with("Could not generate chart: Invalid input"));
        assert_eq!(doc.metrics.len(), 5);
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(metric_label("ma_long_window"), "Ma Long Window");
        assert_eq!(metric_label("rsi"), "Rsi");
        assert_eq!(metric_label("ma50"), "Ma50");
    }

    #[test]
    fn integer_metrics_print_verbatim() {
        assert_eq!(format_metric(&json!(42)), "42");
        assert_eq!(format_metric(&json!(true)), "true");
    }
}
