//! Derived data published by the polling pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adapters::types::{AssetSymbol, ExchangeSnapshot};

// =============================================================================
// Best rate (display highlight)
// =============================================================================

/// Highest available price for one asset and the exchange quoting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestRate {
    pub exchange: String,
    pub price: f64,
}

// =============================================================================
// Rates board
// =============================================================================

/// One complete rates-board cycle: a snapshot per exchange that answered,
/// plus the best-rate highlight for every tracked asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesBoard {
    pub assets: Vec<AssetSymbol>,
    pub snapshots: Vec<ExchangeSnapshot>,
    pub best: BTreeMap<AssetSymbol, BestRate>,
}

// =============================================================================
// Arbitrage
// =============================================================================

/// Which leg to sell when the spread is acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadDirection {
    /// Upbit is richer: buy on Binance, sell on Upbit
    SellOnUpbit,
    /// Binance is richer: buy on Upbit, sell on Binance
    BuyOnUpbit,
}

/// Upbit/Binance spread for one market, recomputed every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageRow {
    /// Binance symbol (e.g. "BTCUSDT")
    pub symbol: String,
    pub upbit_price_usd: f64,
    pub binance_price_usd: f64,
    /// (upbit - binance) / binance * 100
    pub raw_difference_pct: f64,
    /// raw difference minus both venues' fees
    pub net_difference_pct: f64,
    pub is_profitable: bool,
    pub direction: SpreadDirection,
}

/// Where the KRW/USD rate of a cycle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Derived from Upbit KRW-BTC / Binance BTCUSDT
    Live,
    /// Configured fallback
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FxRate {
    /// KRW per USD(T)
    pub krw_per_usd: f64,
    pub source: RateSource,
}

/// Trading fees in percent (0.1 = 0.1%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub upbit_pct: f64,
    pub binance_pct: f64,
}

impl FeeSchedule {
    #[inline]
    pub fn total_pct(&self) -> f64 {
        self.upbit_pct + self.binance_pct
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            upbit_pct: 0.05,
            binance_pct: 0.1,
        }
    }
}

/// One complete arbitrage scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageReport {
    pub fx: FxRate,
    pub fees: FeeSchedule,
    pub threshold_pct: f64,
    /// Upbit markets scanned (e.g. "KRW-BTC")
    pub pairs: Vec<String>,
    pub rows: Vec<ArbitrageRow>,
}
