// =============================================================================
// Service Configuration — JSON file + environment overrides
// =============================================================================
//
// Every tunable lives here: bind address, indicator windows, the Alpha
// Vantage proxy, and the report layout. All fields carry `#[serde(default)]`
// so a partial (or empty) config file still loads.
//
// Secrets (the Alpha Vantage API key) are read from the environment only and
// never serialised.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Largest look-back window (in closes) the service accepts.
pub const MAX_WINDOW: usize = 100_000;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_ma_short_window() -> usize {
    50
}

fn default_ma_long_window() -> usize {
    200
}

fn default_rsi_period() -> usize {
    14
}

fn default_volatility_window() -> usize {
    30
}

fn default_base_url() -> String {
    "https://www.alphavantage.co/query".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_chart_days() -> usize {
    100
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Look-back windows used by the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Short moving-average window (MA50).
    #[serde(default = "default_ma_short_window")]
    pub ma_short_window: usize,

    /// Long moving-average window (MA200).
    #[serde(default = "default_ma_long_window")]
    pub ma_long_window: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Number of trailing returns in the volatility window.
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_short_window: default_ma_short_window(),
            ma_long_window: default_ma_long_window(),
            rsi_period: default_rsi_period(),
            volatility_window: default_volatility_window(),
        }
    }
}

// =============================================================================
// AlphaVantageConfig
// =============================================================================

/// Upstream market-data proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphaVantageConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How long a successful upstream response is served from memory.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Read from `ALPHA_VANTAGE_API_KEY`; never written to disk.
    #[serde(skip)]
    pub api_key: String,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            api_key: String::new(),
        }
    }
}

// =============================================================================
// ReportConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of most recent closes plotted in the report chart.
    #[serde(default = "default_chart_days")]
    pub chart_days: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            chart_days: default_chart_days(),
        }
    }
}

// =============================================================================
// ServiceConfig
// =============================================================================

/// Top-level configuration for the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub indicators: IndicatorParams,

    #[serde(default)]
    pub alpha_vantage: AlphaVantageConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            indicators: IndicatorParams::default(),
            alpha_vantage: AlphaVantageConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read service config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse service config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            indicators = ?config.indicators,
            "service config loaded"
        );

        Ok(config)
    }

    /// Apply environment overrides on top of the file (or default) values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("ANALYSIS_BIND_ADDR").filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(url) = lookup("ALPHA_VANTAGE_BASE_URL").filter(|s| !s.trim().is_empty()) {
            self.alpha_vantage.base_url = url.trim().to_string();
        }
        if let Some(key) = lookup("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage.api_key = key.trim().to_string();
        }
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let p = &self.indicators;
        for (name, value) in [
            ("ma_short_window", p.ma_short_window),
            ("ma_long_window", p.ma_long_window),
            ("rsi_period", p.rsi_period),
            ("volatility_window", p.volatility_window),
            ("chart_days", self.report.chart_days),
        ] {
            if value == 0 {
                bail!("{name} must be greater than zero");
            }
            if value > MAX_WINDOW {
                bail!("{name} must be at most {MAX_WINDOW}, got {value}");
            }
        }
        if self.alpha_vantage.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
