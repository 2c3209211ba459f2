// ---------------------------------------------------------------------------
// Demo bundle -- Alpha Vantage-shaped fixture for when API limits are hit
// ---------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::market_data::MarketBundle;

/// (date, open, high, low, close, volume), newest first as Alpha Vantage
/// returns them.
const DEMO_DAILY: [(&str, &str, &str, &str, &str, &str); 5] = [
    ("2024-01-15", "148.50", "152.00", "147.25", "151.25", "25000000"),
    ("2024-01-14", "145.00", "149.50", "144.75", "148.50", "22000000"),
    ("2024-01-13", "142.00", "146.00", "141.50", "145.00", "28000000"),
    ("2024-01-12", "140.25", "143.75", "139.50", "142.00", "30000000"),
    ("2024-01-11", "138.00", "141.50", "137.25", "140.25", "26000000"),
];

/// Build the demo bundle for `ticker`, stamped with `now`.
pub fn demo_bundle(ticker: &str, now: DateTime<Utc>) -> MarketBundle {
    let symbol = ticker.to_uppercase();
    let minute = now.format("%Y-%m-%dT%H:%M:00").to_string();

    let mut daily_series = serde_json::Map::new();
    for (date, open, high, low, close, volume) in DEMO_DAILY {
        daily_series.insert(
            date.to_string(),
            json!({
                "1. open": open,
                "2. high": high,
                "3. low": low,
                "4. close": close,
                "5. volume": volume,
            }),
        );
    }

    let intraday = json!({
        "Meta Data": {
            "1. Information": "Intraday (5min) open, high, low, close prices and volume",
            "2. Symbol": symbol,
            "3. Last Refreshed": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "4. Interval": "5min",
        },
        "Time Series (5min)": {
            minute: {
                "1. open": "150.00",
                "2. high": "152.50",
                "3. low": "149.75",
                "4. close": "151.25",
                "5. volume": "1000000",
            }
        }
    });

    let daily = json!({
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": symbol,
            "3. Last Refreshed": now.format("%Y-%m-%d").to_string(),
        },
        "Time Series (Daily)": daily_series,
    });

    let news = json!({
        "items": "50",
        "sentiment_score_definition": "x <= -0.35: Bearish; -0.35 < x <= -0.15: Somewhat-Bearish; -0.15 < x < 0.15: Neutral; 0.15 <= x < 0.35: Somewhat_Bullish; x >= 0.35: Bullish",
        "relevance_score_definition": "0 < x <= 1, with a higher score indicating higher relevance.",
        "feed": [
            {
                "title": format!("{symbol} Demo News: Strong Performance Expected"),
                "summary": "Demo news article for testing purposes.",
                "overall_sentiment_score": 0.25,
                "overall_sentiment_label": "Somewhat-Bullish",
            }
        ]
    });

    MarketBundle {
        ticker: symbol,
        intraday,
        daily,
        news,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 14, 37, 12).unwrap()
    }

    #[test]
    fn demo_is_stamped_and_uppercased() {
        let bundle = demo_bundle("goog", now());
        assert_eq!(bundle.ticker, "GOOG");
        assert_eq!(bundle.daily["Meta Data"]["3. Last Refreshed"], "2024-03-01");
        assert_eq!(bundle.daily["Meta Data"]["2. Symbol"], "GOOG");
        assert!(bundle.intraday["Time Series (5min)"]
            .get("2024-03-01T14:37:00")
            .is_some());
        assert_eq!(
            bundle.news["feed"][0]["title"],
            "GOOG Demo News: Strong Performance Expected"
        );
    }

    #[test]
    fn demo_daily_feeds_the_engine() {
        let bundle = demo_bundle("goog", now());
        let result = engine::analyze("goog", &bundle.daily).unwrap();
        let expected = (140.25 + 142.0 + 145.0 + 148.5 + 151.25) / 5.0;
        assert!((result.ma_short - expected).abs() < 1e-10);
        assert!(result.rsi.is_nan());
        assert!(result.volatility.is_nan());
    }
}
