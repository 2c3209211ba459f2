pub mod cache;
pub mod client;
pub mod demo;

use serde::Serialize;
use serde_json::Value;

pub use client::AlphaVantageClient;

/// Raw upstream responses for one ticker, passed through unmodified.
#[derive(Debug, Clone, Serialize)]
pub struct MarketBundle {
    pub ticker: String,
    pub intraday: Value,
    pub daily: Value,
    pub news: Value,
}
