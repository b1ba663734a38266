//! Rate Scanner entry point
//!
//! Orchestrates:
//! 1. Config + logging initialization
//! 2. Shared HTTP quote client
//! 3. Rates board scheduler
//! 4. Arbitrage scanner scheduler (optional)
//! 5. axum read API server
//! 6. Ctrl+C graceful shutdown

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use rate_scanner::config::constants::{apply_env_overrides, config_path, log_configuration};
use rate_scanner::config::logging::init_logging;
use rate_scanner::config::load_config_or_default;
use rate_scanner::core::{ArbitrageScanner, BoardPoller, PollingScheduler, PriceAggregator};
use rate_scanner::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // =========================================================================
    // 1. Config + logging
    // =========================================================================
    dotenvy::dotenv().ok();
    init_logging();

    info!("=== Rate Scanner ===");

    let path = config_path();
    let mut config = load_config_or_default(&path)?;
    apply_env_overrides(&mut config);
    log_configuration(&config);
    let config = config.into_shared();

    // =========================================================================
    // 2. Shared HTTP client
    // =========================================================================
    let client = config.quote_client()?;

    // =========================================================================
    // 3. Rates board
    // =========================================================================
    let board = BoardPoller::new(
        PriceAggregator::new(client.clone()),
        config.board.exchanges.clone(),
        config.board.assets.clone(),
    );
    let rates = PollingScheduler::new(board, Duration::from_millis(config.board.poll_interval_ms)).start();

    // =========================================================================
    // 4. Arbitrage scanner
    // =========================================================================
    let arbitrage = if config.arbitrage.enabled {
        let scanner = ArbitrageScanner::new(client, config.arbitrage.clone());
        Some(
            PollingScheduler::new(scanner, Duration::from_millis(config.arbitrage.poll_interval_ms))
                .start(),
        )
    } else {
        None
    };

    // =========================================================================
    // 5. axum read API server
    // =========================================================================
    let state = AppState {
        rates: rates.clone(),
        arbitrage: arbitrage.clone(),
    };
    let port = config.server.port;
    let shutdown = CancellationToken::new();
    let server_shutdown = shutdown.clone();

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(state, port, server_shutdown).await {
            error!(error = %e, "Read API server failed");
        }
    });

    // =========================================================================
    // 6. Wait for Ctrl+C → graceful shutdown
    // =========================================================================
    info!("Server running on http://0.0.0.0:{}", port);
    info!("Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    rates.shutdown();
    if let Some(handle) = &arbitrage {
        handle.shutdown();
    }
    shutdown.cancel();
    let _ = server_handle.await;

    info!("Shutdown complete");
    Ok(())
}
