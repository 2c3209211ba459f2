// =============================================================================
// Application State — shared by every HTTP handler
// =============================================================================
//
// Holds only what the HTTP surface needs: configuration, the upstream
// client (with its response cache), and request counters. The indicator
// engine itself is stateless and is constructed by value per request.
//
// Thread safety:
//   - Atomic counters for lock-free request accounting.
//   - The upstream cache manages its own interior mutability.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::Result;

use crate::engine::IndicatorEngine;
use crate::market_data::AlphaVantageClient;
use crate::runtime_config::ServiceConfig;

/// Shared state passed to handlers via `Arc<AppState>`.
pub struct AppState {
    pub config: ServiceConfig,
    pub alpha_vantage: AlphaVantageClient,

    analyses_served: AtomicU64,
    analyses_failed: AtomicU64,

    /// Instant when the service was started. Used for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let alpha_vantage = AlphaVantageClient::new(&config.alpha_vantage)?;
        Ok(Self {
            config,
            alpha_vantage,
            analyses_served: AtomicU64::new(0),
            analyses_failed: AtomicU64::new(0),
            start_time: Instant::now(),
        })
    }

    pub fn engine(&self) -> IndicatorEngine {
        IndicatorEngine::new(self.config.indicators)
    }

    // ── Request accounting ──────────────────────────────────────────────

    pub fn record_analysis(&self, ok: bool) {
        let counter = if ok {
            &self.analyses_served
        } else {
            &self.analyses_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn analyses_served(&self) -> u64 {
        self.analyses_served.load(Ordering::Relaxed)
    }

    pub fn analyses_failed(&self) -> u64 {
        self.analyses_failed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_outcomes() {
        let state = AppState::new(ServiceConfig::default()).unwrap();
        state.record_analysis(true);
        state.record_analysis(true);
        state.record_analysis(false);
        assert_eq!(state.analyses_served(), 2);
        assert_eq!(state.analyses_failed(), 1);
    }
}
