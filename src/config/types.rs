//! Configuration types for the rate scanner
//!
//! This module defines all configuration structs that are loaded from YAML
//! and shared read-only across the application via `Arc<AppConfig>`.
//! Every section has defaults, so a partial file (or no file) is valid.

use std::collections::HashSet;
use std::sync::Arc;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::adapters::{default_descriptors, upbit, AssetSymbol, ExchangeDescriptor, QuoteClient};
use crate::core::types::FeeSchedule;
use crate::error::{AppError, Result};

// ============================================================================
// Type Aliases
// ============================================================================

/// Configuration is built once at startup and never mutated
pub type SharedConfig = Arc<AppConfig>;

// ============================================================================
// Configuration Structs
// ============================================================================

/// Read API server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP port (overridden by `PORT`)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Outbound HTTP settings shared by every exchange request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: crate::adapters::DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Rates board: which exchanges to poll for which assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub poll_interval_ms: u64,
    /// Tracked assets, in display order
    pub assets: Vec<AssetSymbol>,
    /// Exchanges, in display order
    pub exchanges: Vec<ExchangeDescriptor>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_000,
            assets: vec![
                AssetSymbol::Btc,
                AssetSymbol::Eth,
                AssetSymbol::Usdt,
                AssetSymbol::Solana,
                AssetSymbol::Ton,
                AssetSymbol::Xrp,
                AssetSymbol::Ltc,
            ],
            exchanges: default_descriptors(),
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(AppError::Config(
                "board.poll_interval_ms must be > 0".to_string(),
            ));
        }

        if self.assets.is_empty() {
            return Err(AppError::Config(
                "board.assets must contain at least one asset".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for exchange in &self.exchanges {
            exchange
                .validate()
                .map_err(|e| AppError::Config(format!("board.exchanges: {}", e)))?;
            if !names.insert(exchange.name.as_str()) {
                return Err(AppError::Config(format!(
                    "board.exchanges: duplicate exchange name '{}'",
                    exchange.name
                )));
            }
        }

        Ok(())
    }
}

/// Upbit/Binance arbitrage scanner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrageConfig {
    pub enabled: bool,
    pub poll_interval_ms: u64,
    /// Upbit REST base (e.g. "https://api.upbit.com/v1")
    pub upbit_url: String,
    /// Binance REST base (e.g. "https://api.binance.com/api/v3")
    pub binance_url: String,
    /// Minimum |net spread| in percent for a row to count as profitable
    pub threshold_pct: f64,
    pub fees: FeeSchedule,
    /// KRW per USD used when the live rate cannot be derived
    pub default_krw_rate: f64,
    /// Upbit markets allowed into the scan
    pub markets: Vec<String>,
}

impl Default for ArbitrageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 5_000,
            upbit_url: upbit::API_URL.to_string(),
            binance_url: "https://api.binance.com/api/v3".to_string(),
            threshold_pct: 1.0,
            fees: FeeSchedule::default(),
            default_krw_rate: 1350.0,
            markets: ["KRW-BTC", "KRW-ETH", "KRW-XRP", "KRW-SOL"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl ArbitrageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(AppError::Config(
                "arbitrage.poll_interval_ms must be > 0".to_string(),
            ));
        }

        for (field, url) in [("upbit_url", &self.upbit_url), ("binance_url", &self.binance_url)] {
            Url::parse(url).map_err(|e| {
                AppError::Config(format!("arbitrage.{} '{}' is not a valid URL: {}", field, url, e))
            })?;
        }

        for (field, value) in [
            ("threshold_pct", self.threshold_pct),
            ("fees.upbit_pct", self.fees.upbit_pct),
            ("fees.binance_pct", self.fees.binance_pct),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::Config(format!(
                    "arbitrage.{} must be finite and >= 0 (got {})",
                    field, value
                )));
            }
        }

        if !self.default_krw_rate.is_finite() || self.default_krw_rate <= 0.0 {
            return Err(AppError::Config(format!(
                "arbitrage.default_krw_rate must be > 0 (got {})",
                self.default_krw_rate
            )));
        }

        if self.markets.is_empty() {
            return Err(AppError::Config(
                "arbitrage.markets must contain at least one market".to_string(),
            ));
        }
        if let Some(market) = self.markets.iter().find(|m| !m.starts_with(upbit::KRW_PREFIX)) {
            return Err(AppError::Config(format!(
                "arbitrage.markets: '{}' is not a KRW market",
                market
            )));
        }

        Ok(())
    }
}

/// Root application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub board: BoardConfig,
    pub arbitrage: ArbitrageConfig,
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_ms == 0 {
            return Err(AppError::Config(
                "http.timeout_ms must be > 0".to_string(),
            ));
        }

        self.board.validate()?;

        // A disabled scanner may carry placeholder settings
        if self.arbitrage.enabled {
            self.arbitrage.validate()?;
        }

        Ok(())
    }

    /// HTTP client shared by every exchange request.
    pub fn quote_client(&self) -> Result<QuoteClient> {
        Ok(QuoteClient::new(self.http.timeout_ms)?)
    }

    /// Convert to shared wrapper for async access
    pub fn into_shared(self) -> SharedConfig {
        Arc::new(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.http.timeout_ms, 5_000);
        assert_eq!(config.board.poll_interval_ms, 2_000);
        assert_eq!(config.board.assets.len(), 7);
        assert_eq!(config.board.exchanges.len(), 4);
        assert_eq!(config.arbitrage.poll_interval_ms, 5_000);
        assert_eq!(config.arbitrage.default_krw_rate, 1350.0);
    }

    #[test]
    fn test_quote_client_from_config() {
        let mut config = AppConfig::default();
        config.http.timeout_ms = 1_500;
        assert!(config.quote_client().is_ok());
    }

    #[test]
    fn test_zero_timeout_fails() {
        let mut config = AppConfig::default();
        config.http.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http.timeout_ms"));
    }

    #[test]
    fn test_zero_board_interval_fails() {
        let mut config = AppConfig::default();
        config.board.poll_interval_ms = 0;
        assert!(config.validate().unwrap_err().to_string().contains("board.poll_interval_ms"));
    }

    #[test]
    fn test_empty_assets_fails() {
        let mut config = AppConfig::default();
        config.board.assets.clear();
        assert!(config.validate().unwrap_err().to_string().contains("at least one asset"));
    }

    #[test]
    fn test_duplicate_exchange_name_fails() {
        let mut config = AppConfig::default();
        let first = config.board.exchanges[0].clone();
        config.board.exchanges.push(first);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate exchange name 'Binance'"), "Got: {}", err);
    }

    #[test]
    fn test_invalid_exchange_endpoint_fails() {
        let mut config = AppConfig::default();
        config.board.exchanges[1].endpoint = "ftp://bybit.example".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"), "Got: {}", err);
    }

    #[test]
    fn test_negative_fee_fails() {
        let mut config = AppConfig::default();
        config.arbitrage.fees.binance_pct = -0.1;
        assert!(config.validate().unwrap_err().to_string().contains("fees.binance_pct"));
    }

    #[test]
    fn test_nan_threshold_fails() {
        let mut config = AppConfig::default();
        config.arbitrage.threshold_pct = f64::NAN;
        assert!(config.validate().unwrap_err().to_string().contains("threshold_pct"));
    }

    #[test]
    fn test_zero_default_rate_fails() {
        let mut config = AppConfig::default();
        config.arbitrage.default_krw_rate = 0.0;
        assert!(config.validate().unwrap_err().to_string().contains("default_krw_rate"));
    }

    #[test]
    fn test_non_krw_market_fails() {
        let mut config = AppConfig::default();
        config.arbitrage.markets.push("BTC-ETH".to_string());
        assert!(config.validate().unwrap_err().to_string().contains("'BTC-ETH' is not a KRW market"));
    }

    #[test]
    fn test_disabled_arbitrage_skips_validation() {
        let mut config = AppConfig::default();
        config.arbitrage.enabled = false;
        config.arbitrage.markets.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_yaml_roundtrip_of_defaults() {
        let yaml = serde_yaml::to_string(&AppConfig::default()).unwrap();
        let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
