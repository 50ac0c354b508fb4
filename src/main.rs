// =============================================================================
// Forex Insight — Main Entry Point
// =============================================================================
//
// Loads the runtime configuration, builds the shared state and serves the
// indicator API until Ctrl+C.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod enrichment;
mod indicators;
mod risk;
mod runtime_config;
mod signals;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

const DEFAULT_CONFIG_PATH: &str = "runtime_config.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Forex Insight starting up");

    let config_path =
        std::env::var("FOREX_INSIGHT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());

    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    for msg in config.sanitize() {
        warn!(error = %msg, "Invalid config section, using defaults");
    }

    info!(
        screener = ?config.screener,
        crossover = ?config.crossover,
        analysis = ?config.analysis,
        "Indicator configuration"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let admin_token = std::env::var("FOREX_INSIGHT_ADMIN_TOKEN").ok();
    if admin_token.as_deref().map_or(true, str::is_empty) {
        warn!("FOREX_INSIGHT_ADMIN_TOKEN not set — configuration endpoints are disabled");
    }
    let state = Arc::new(AppState::new(config, &config_path, admin_token));

    // ── 3. Start the API server ──────────────────────────────────────────
    let bind_addr =
        std::env::var("FOREX_INSIGHT_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    if let Err(e) = state.config_snapshot().save(&state.config_path) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!(
        requests_served = state.requests_served(),
        "Forex Insight shut down complete."
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
