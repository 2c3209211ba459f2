// =============================================================================
// Alpha Vantage REST Client — cached query proxy
// =============================================================================
//
// The API key travels as the `apikey` query parameter (Alpha Vantage has no
// header auth). It is excluded from cache keys and never logged.
//
// Alpha Vantage reports throttling and bad symbols with HTTP 200 and a
// message body; those bodies are turned into errors and never cached.
// =============================================================================

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::market_data::cache::ResponseCache;
use crate::market_data::MarketBundle;
use crate::runtime_config::AlphaVantageConfig;

/// Body keys Alpha Vantage uses for in-band failures.
const UPSTREAM_ERROR_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

/// Alpha Vantage client with a per-query TTL cache.
pub struct AlphaVantageClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    cache: ResponseCache,
}

impl AlphaVantageClient {
    pub fn new(config: &AlphaVantageConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %config.base_url, "AlphaVantageClient initialised");

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            client,
            cache: ResponseCache::new(Duration::from_secs(config.cache_ttl_secs)),
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// GET `?function=<function>&<params>&apikey=...`, served from the cache
    /// when a fresh copy exists.
    #[instrument(skip(self), name = "alpha_vantage::query")]
    pub async fn query(&self, function: &str, params: &[(&str, &str)]) -> Result<Value> {
        let key = cache_key(function, params);
        if let Some(hit) = self.cache.get(&key) {
            debug!(cache_key = %key, "cache hit");
            return Ok(hit);
        }

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 2);
        query.push(("function", function));
        query.extend_from_slice(params);
        query.push(("apikey", self.api_key.as_str()));

        let resp = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("Alpha Vantage {function} request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("Alpha Vantage {function} returned {status}: {text}");
        }

        let body: Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse Alpha Vantage {function} response"))?;
        check_upstream_error(&body).with_context(|| format!("Alpha Vantage {function} rejected"))?;

        self.cache.insert(key, body.clone());
        debug!(function, "upstream response cached");
        Ok(body)
    }

    /// Intraday (5min), daily and news sentiment for `ticker`, fetched
    /// concurrently.
    #[instrument(skip(self), name = "alpha_vantage::fetch_bundle")]
    pub async fn fetch_bundle(&self, ticker: &str) -> Result<MarketBundle> {
        let intraday_params = [("symbol", ticker), ("interval", "5min")];
        let daily_params = [("symbol", ticker)];
        let news_params = [("tickers", ticker)];

        let (intraday, daily, news) = tokio::try_join!(
            self.query("TIME_SERIES_INTRADAY", &intraday_params),
            self.query("TIME_SERIES_DAILY", &daily_params),
            self.query("NEWS_SENTIMENT", &news_params),
        )?;

        Ok(MarketBundle {
            ticker: ticker.to_string(),
            intraday,
            daily,
            news,
        })
    }
}

/// Cache key for a query. The API key is not part of it.
fn cache_key(function: &str, params: &[(&str, &str)]) -> String {
    let mut key = format!("function={function}");
    for (k, v) in params {
        key.push('&');
        key.push_str(k);
        key.push('=');
        key.push_str(v);
    }
    key
}

/// Fail on Alpha Vantage's in-band error bodies.
fn check_upstream_error(body: &Value) -> Result<()> {
    for key in UPSTREAM_ERROR_KEYS {
        if let Some(msg) = body.get(key).and_then(|v| v.as_str()) {
            bail!("{key}: {msg}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local upstream that answers every request with `status` and `body`.
    async fn stub_upstream(status: &'static str, content_type: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let resp = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(resp.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/query")
    }

    fn client_for(base_url: String) -> AlphaVantageClient {
        let config = AlphaVantageConfig {
            base_url,
            ..AlphaVantageConfig::default()
        };
        AlphaVantageClient::new(&config).unwrap()
    }

    #[test]
    fn cache_key_excludes_api_key() {
        let key = cache_key("TIME_SERIES_INTRADAY", &[("symbol", "GOOG"), ("interval", "5min")]);
        assert_eq!(key, "function=TIME_SERIES_INTRADAY&symbol=GOOG&interval=5min");
    }

    #[test]
    fn upstream_error_bodies_are_rejected() {
        let throttled = json!({ "Note": "Thank you for using Alpha Vantage! ..." });
        let err = check_upstream_error(&throttled).unwrap_err();
        assert!(err.to_string().starts_with("Note: Thank you"));

        let bad_symbol = json!({ "Error Message": "Invalid API call." });
        assert!(check_upstream_error(&bad_symbol).is_err());

        let info = json!({ "Information": "premium endpoint" });
        assert!(check_upstream_error(&info).is_err());
    }

    #[test]
    fn normal_body_passes() {
        let body = json!({ "Meta Data": {}, "Time Series (Daily)": {} });
        assert!(check_upstream_error(&body).is_ok());
    }

    #[tokio::test]
    async fn cached_query_skips_network() {
        let config = AlphaVantageConfig {
            // Unroutable: any real request would fail.
            base_url: "http://127.0.0.1:9/query".into(),
            ..AlphaVantageConfig::default()
        };
        let client = AlphaVantageClient::new(&config).unwrap();
        assert!(!client.has_api_key());

        let body = json!({ "Time Series (Daily)": { "2024-01-11": { "4. close": "1" } } });
        client
            .cache
            .insert(cache_key("TIME_SERIES_DAILY", &[("symbol", "GOOG")]), body.clone());

        let got = client
            .query("TIME_SERIES_DAILY", &[("symbol", "GOOG")])
            .await
            .unwrap();
        assert_eq!(got, body);
    }

    #[tokio::test]
    async fn throttled_body_is_not_cached() {
        let body = json!({ "Note": "Thank you for using Alpha Vantage!" }).to_string();
        let client = client_for(stub_upstream("200 OK", "application/json", body).await);

        let err = client
            .query("TIME_SERIES_DAILY", &[("symbol", "GOOG")])
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("Note: Thank you"));
        assert_eq!(client.cache.len(), 0);
    }

    #[tokio::test]
    async fn successful_body_is_cached() {
        let body = json!({ "Time Series (Daily)": {} }).to_string();
        let client = client_for(stub_upstream("200 OK", "application/json", body).await);

        client
            .query("TIME_SERIES_DAILY", &[("symbol", "GOOG")])
            .await
            .unwrap();
        assert_eq!(client.cache.len(), 1);
    }

    #[tokio::test]
    async fn non_json_error_page_keeps_status() {
        let page = "<html><body>Bad Gateway</body></html>".to_string();
        let client = client_for(stub_upstream("502 Bad Gateway", "text/html", page).await);

        let err = client
            .query("TIME_SERIES_DAILY", &[("symbol", "GOOG")])
            .await
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("502"), "got {msg}");
        assert!(msg.contains("Bad Gateway"));
        assert_eq!(client.cache.len(), 0);
    }
}
