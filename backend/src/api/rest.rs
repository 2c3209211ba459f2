// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`:
//
//   GET  /health        liveness + request counters
//   POST /analysis      {ticker, daily} -> {ticker, ma50, ma200, volatility, rsi}
//   POST /report        {ticker, analysis, daily} -> report document
//   GET  /fetch         ?ticker=T  Alpha Vantage intraday/daily/news (cached)
//   GET  /fetch/demo    ?ticker=T  Alpha Vantage-shaped demo data
//
// CORS is configured permissively; the mobile client calls from any origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::app_state::AppState;
use crate::error::AnalysisError;
use crate::market_data::demo::demo_bundle;
use crate::market_data::MarketBundle;
use crate::report::{build_report, ReportDocument, ReportPayload};
use crate::types::IndicatorResult;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analysis", post(analysis))
        .route("/api/v1/report", post(report))
        .route("/api/v1/fetch", get(fetch))
        .route("/api/v1/fetch/demo", get(fetch_demo))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    analyses_served: u64,
    analyses_failed: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
        analyses_served: state.analyses_served(),
        analyses_failed: state.analyses_failed(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Deserialize)]
struct AnalysisRequest {
    ticker: String,
    #[serde(default)]
    daily: Value,
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<IndicatorResult>, AnalysisError> {
    let outcome = state.engine().analyze(&req.ticker, &req.daily);
    state.record_analysis(outcome.is_ok());

    let result = outcome?;
    info!(ticker = %result.ticker, rsi = result.rsi, "analysis served");
    Ok(Json(result))
}

// =============================================================================
// Report
// =============================================================================

async fn report(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReportPayload>,
) -> Json<ReportDocument> {
    let doc = build_report(&payload, state.config.report.chart_days);
    info!(ticker = %payload.ticker, chart = doc.chart.is_some(), "report built");
    Json(doc)
}

// =============================================================================
// Market data proxy
// =============================================================================

#[derive(Deserialize)]
struct TickerQuery {
    #[serde(default)]
    ticker: Option<String>,
}

impl TickerQuery {
    fn ticker(&self) -> Result<&str, (StatusCode, Json<Value>)> {
        match self.ticker.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => Ok(t),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing \"ticker\" query parameter." })),
            )),
        }
    }
}

async fn fetch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TickerQuery>,
) -> Result<Json<MarketBundle>, (StatusCode, Json<Value>)> {
    let ticker = query.ticker()?;

    match state.alpha_vantage.fetch_bundle(ticker).await {
        Ok(bundle) => Ok(Json(bundle)),
        Err(e) => {
            error!(ticker, error = %format!("{e:#}"), "market data fetch failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch data from Alpha Vantage." })),
            ))
        }
    }
}

async fn fetch_demo(
    Query(query): Query<TickerQuery>,
) -> Result<Json<MarketBundle>, (StatusCode, Json<Value>)> {
    let ticker = query.ticker()?;
    Ok(Json(demo_bundle(ticker, chrono::Utc::now())))
}
