//! Environment overrides and startup summary
//!
//! Values here are read from the process environment (after `.env` is
//! loaded) and take precedence over the YAML file.

use std::path::PathBuf;

use super::types::AppConfig;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration file path
///
/// Environment variable: `RATE_SCANNER_CONFIG`
pub fn config_path() -> PathBuf {
    std::env::var("RATE_SCANNER_CONFIG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Read API port override
///
/// Environment variable: `PORT`
pub fn port_override() -> Option<u16> {
    std::env::var("PORT").ok().and_then(|s| s.parse().ok())
}

/// Apply environment overrides on top of a loaded configuration.
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Some(port) = port_override() {
        config.server.port = port;
    }
}

/// Print the effective configuration (startup logs)
pub fn log_configuration(config: &AppConfig) {
    tracing::info!("=== Rate Scanner Configuration ===");
    tracing::info!("Server: port {}", config.server.port);
    tracing::info!("HTTP: timeout {}ms", config.http.timeout_ms);

    tracing::info!("Rates board (every {}ms):", config.board.poll_interval_ms);
    let assets: Vec<&str> = config.board.assets.iter().map(|a| a.as_str()).collect();
    tracing::info!("  - Assets: {}", assets.join(", "));
    for exchange in &config.board.exchanges {
        tracing::info!(
            "  - {} ({}, {} symbols)",
            exchange.name,
            exchange.shape,
            exchange.symbols.len()
        );
    }

    if config.arbitrage.enabled {
        let arb = &config.arbitrage;
        tracing::info!("Arbitrage (every {}ms):", arb.poll_interval_ms);
        tracing::info!("  - Markets: {}", arb.markets.join(", "));
        tracing::info!("  - Threshold: {}%", arb.threshold_pct);
        tracing::info!(
            "  - Fees: upbit {}% + binance {}%",
            arb.fees.upbit_pct,
            arb.fees.binance_pct
        );
        tracing::info!("  - Default KRW rate: {}", arb.default_krw_rate);
    } else {
        tracing::info!("Arbitrage: disabled");
    }
    tracing::info!("==================================");
}
