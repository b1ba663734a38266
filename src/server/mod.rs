//! Read API for the published rates board and arbitrage report.
//!
//! Uses `axum` for HTTP routing with CORS support. Handlers only read the
//! schedulers' published state or trigger a refresh; they never block on
//! exchange I/O.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::core::scheduler::{Published, SchedulerHandle};
use crate::core::types::{ArbitrageReport, RatesBoard};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub rates: SchedulerHandle<RatesBoard>,
    /// `None` when the arbitrage scanner is disabled
    pub arbitrage: Option<SchedulerHandle<ArbitrageReport>>,
}

type ApiError = (StatusCode, Json<Value>);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/rates", get(rates_handler))
        .route("/api/rates/refresh", post(rates_refresh_handler))
        .route("/api/arbitrage", get(arbitrage_handler))
        .route("/api/arbitrage/refresh", post(arbitrage_refresh_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server on `0.0.0.0:port`.
///
/// Blocks until `shutdown` is cancelled.
pub async fn start_server(state: AppState, port: u16, shutdown: CancellationToken) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "Starting read API server");
    serve(listener, state, shutdown).await
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState, shutdown: CancellationToken) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().timestamp_millis(),
        "rates_cycle": state.rates.current().cycle,
        "arbitrage_enabled": state.arbitrage.is_some(),
    }))
}

/// GET /api/rates
async fn rates_handler(State(state): State<AppState>) -> Json<Published<RatesBoard>> {
    Json(state.rates.current())
}

/// POST /api/rates/refresh
async fn rates_refresh_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    state.rates.refresh();
    accepted()
}

/// GET /api/arbitrage
async fn arbitrage_handler(
    State(state): State<AppState>,
) -> Result<Json<Published<ArbitrageReport>>, ApiError> {
    let handle = state.arbitrage.as_ref().ok_or_else(arbitrage_disabled)?;
    Ok(Json(handle.current()))
}

/// POST /api/arbitrage/refresh
async fn arbitrage_refresh_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let handle = state.arbitrage.as_ref().ok_or_else(arbitrage_disabled)?;
    handle.refresh();
    Ok(accepted())
}

fn accepted() -> (StatusCode, Json<Value>) {
    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" })))
}

fn arbitrage_disabled() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Arbitrage scanner is disabled" })),
    )
}
