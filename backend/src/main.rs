// =============================================================================
// Market Analysis Service — Main Entry Point
// =============================================================================
//
// Computes moving averages, RSI and rolling volatility from Alpha Vantage
// daily series, proxies the upstream market data, and lays out the ticker
// report. Every request is independent; nothing is persisted.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod engine;
mod error;
mod indicators;
mod market_data;
mod report;
mod runtime_config;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("ANALYSIS_CONFIG").unwrap_or_else(|_| "analysis_config.json".into());

    let mut config = ServiceConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ServiceConfig::default()
    });
    config.apply_env();
    config.validate().context("invalid service configuration")?;

    info!(
        indicators = ?config.indicators,
        cache_ttl_secs = config.alpha_vantage.cache_ttl_secs,
        "Market analysis service starting"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config)?);
    if !state.alpha_vantage.has_api_key() {
        warn!("ALPHA_VANTAGE_API_KEY not set; /api/v1/fetch will be rejected upstream");
    }

    // ── 3. Serve until Ctrl+C ────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Market analysis service shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
