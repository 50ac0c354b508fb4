// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The computation endpoints take the
// price history in the request body (the market-data fetch happens upstream)
// and answer synchronously. The configuration endpoints require a valid
// Bearer token checked via the `AuthBearer` extractor.
//
// CORS is configured permissively for the browser dashboard.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::analysis::{analyze, AnalysisParams, AnalysisReport};
use crate::api::auth::AuthBearer;
use crate::app_state::AppState;
use crate::enrichment::enrich;
use crate::risk::{calculate_position_size, RiskRequest, RiskResponse};
use crate::signals::{detect_crossover, screen, CrossSignal, ScreenerItem, SymbolSeries};
use crate::types::{EnrichedBar, PriceBar};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

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
        // ── Public ──────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/chart/enrich", post(enrich_chart))
        .route("/api/v1/screener", post(screener))
        .route("/api/v1/signals", post(signals))
        .route("/api/v1/analysis", post(analysis))
        .route("/api/v1/risk", post(risk))
        // ── Authenticated ───────────────────────────────────────────
        .route("/api/v1/config", get(get_config))
        .route("/api/v1/config/analysis", post(update_analysis))
        // ── Middleware & State ───────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

fn default_symbol() -> String {
    "EUR/USD".to_string()
}

fn default_interval() -> String {
    "1h".to_string()
}

fn default_analysis_symbol() -> String {
    "GBP/USD".to_string()
}

fn default_analysis_interval() -> String {
    "4h".to_string()
}

fn default_base_currency() -> String {
    "USD".to_string()
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    requests_served: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        requests_served: state.requests_served(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Chart enrichment
// =============================================================================

#[derive(Deserialize)]
struct ChartRequest {
    #[serde(default = "default_symbol")]
    symbol: String,
    #[serde(default = "default_interval")]
    interval: String,
    bars: Vec<PriceBar>,
}

#[derive(Serialize)]
struct ChartResponse {
    symbol: String,
    interval: String,
    bars: Vec<EnrichedBar>,
}

async fn enrich_chart(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChartRequest>,
) -> Json<ChartResponse> {
    let bars = enrich(&req.bars);
    state.record_request();
    debug!(symbol = %req.symbol, interval = %req.interval, bars = bars.len(), "chart enriched");

    Json(ChartResponse {
        symbol: req.symbol,
        interval: req.interval,
        bars,
    })
}

// =============================================================================
// Screener
// =============================================================================

#[derive(Deserialize)]
struct ScreenerRequest {
    #[serde(default = "default_base_currency")]
    base_currency: String,
    series: Vec<SymbolSeries>,
}

#[derive(Serialize)]
struct ScreenerResponse {
    base_currency: String,
    items: Vec<ScreenerItem>,
}

async fn screener(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScreenerRequest>,
) -> Json<ScreenerResponse> {
    let params = state.runtime_config.read().screener.clone();
    let now = chrono::Utc::now().with_timezone(&params.offset());
    let items = screen(&req.series, &params, now);
    state.record_request();
    debug!(
        base_currency = %req.base_currency,
        requested = req.series.len(),
        screened = items.len(),
        "screener run"
    );

    Json(ScreenerResponse {
        base_currency: req.base_currency,
        items,
    })
}

// =============================================================================
// Crossover signals
// =============================================================================

#[derive(Deserialize)]
struct SignalRequest {
    #[serde(default = "default_symbol")]
    symbol: String,
    bars: Vec<PriceBar>,
}

#[derive(Serialize)]
struct SignalResponse {
    signal: Option<CrossSignal>,
}

async fn signals(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignalRequest>,
) -> Json<SignalResponse> {
    let params = state.runtime_config.read().crossover.clone();
    let signal = detect_crossover(&req.symbol, &req.bars, params.fast, params.slow);
    state.record_request();
    if let Some(s) = &signal {
        info!(symbol = %s.symbol, kind = %s.kind, action = %s.action, "crossover detected");
    }

    Json(SignalResponse { signal })
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Deserialize)]
struct AnalysisRequest {
    #[serde(default = "default_analysis_symbol")]
    symbol: String,
    #[serde(default = "default_analysis_interval")]
    interval: String,
    bars: Vec<PriceBar>,
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let params = state.runtime_config.read().analysis.clone();
    state.record_request();

    analyze(&req.symbol, &req.interval, &req.bars, &params)
        .map(Json)
        .ok_or_else(|| {
            debug!(symbol = %req.symbol, bars = req.bars.len(), "analysis: insufficient history");
            api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("not enough price history to analyse {} ({} bars)", req.symbol, req.bars.len()),
            )
        })
}

// =============================================================================
// Risk
// =============================================================================

async fn risk(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RiskRequest>,
) -> Result<Json<RiskResponse>, ApiError> {
    state.record_request();
    calculate_position_size(&req)
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

// =============================================================================
// Configuration (authenticated)
// =============================================================================

async fn get_config(_auth: AuthBearer, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config_snapshot())
}

#[derive(Deserialize)]
struct AnalysisUpdate {
    #[serde(default)]
    rsi_period: Option<usize>,
    #[serde(default)]
    adx_period: Option<usize>,
    #[serde(default)]
    macd_fast: Option<usize>,
    #[serde(default)]
    macd_slow: Option<usize>,
    #[serde(default)]
    macd_signal: Option<usize>,
}

#[derive(Serialize)]
struct AnalysisUpdateResponse {
    analysis: AnalysisParams,
    changes: Vec<String>,
}

async fn update_analysis(
    _auth: AuthBearer,
    State(state): State<Arc<AppState>>,
    Json(update): Json<AnalysisUpdate>,
) -> Result<Json<AnalysisUpdateResponse>, ApiError> {
    let mut config = state.runtime_config.write();
    let mut params = config.analysis.clone();
    let mut changes = Vec::new();

    macro_rules! apply_param {
        ($field:ident) => {
            if let Some(val) = update.$field {
                if params.$field != val {
                    changes.push(format!("{}: {} -> {}", stringify!($field), params.$field, val));
                    params.$field = val;
                }
            }
        };
    }

    apply_param!(rsi_period);
    apply_param!(adx_period);
    apply_param!(macd_fast);
    apply_param!(macd_slow);
    apply_param!(macd_signal);

    params
        .validate()
        .map_err(|msg| api_error(StatusCode::BAD_REQUEST, msg))?;

    if changes.is_empty() {
        return Ok(Json(AnalysisUpdateResponse {
            analysis: params,
            changes,
        }));
    }

    config.analysis = params.clone();
    let config_clone = config.clone();
    drop(config);

    info!(changes = ?changes, "Analysis parameters updated");
    if let Err(e) = config_clone.save(&state.config_path) {
        warn!(error = %e, "Failed to save runtime config to disk");
    }
    state.increment_version();

    Ok(Json(AnalysisUpdateResponse {
        analysis: params,
        changes,
    }))
}
