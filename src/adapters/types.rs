//! Common price model shared by every exchange adapter.
//!
//! Adapters translate exchange-native payloads into `PriceQuote`s keyed by
//! `AssetSymbol`; the aggregator groups them into one `ExchangeSnapshot`
//! per exchange per polling cycle.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Note attached to stablecoin quotes
pub const STABLECOIN_NOTE: &str = "Stablecoin pair";

// =============================================================================
// AssetSymbol
// =============================================================================

/// Tracked token identifier, stable across exchanges (join key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetSymbol {
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "USDT")]
    Usdt,
    #[serde(rename = "SOLANA")]
    Solana,
    #[serde(rename = "TON")]
    Ton,
    #[serde(rename = "XRP")]
    Xrp,
    #[serde(rename = "LTC")]
    Ltc,
    #[serde(rename = "DOT")]
    Dot,
}

impl AssetSymbol {
    pub const ALL: [AssetSymbol; 8] = [
        AssetSymbol::Btc,
        AssetSymbol::Eth,
        AssetSymbol::Usdt,
        AssetSymbol::Solana,
        AssetSymbol::Ton,
        AssetSymbol::Xrp,
        AssetSymbol::Ltc,
        AssetSymbol::Dot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetSymbol::Btc => "BTC",
            AssetSymbol::Eth => "ETH",
            AssetSymbol::Usdt => "USDT",
            AssetSymbol::Solana => "SOLANA",
            AssetSymbol::Ton => "TON",
            AssetSymbol::Xrp => "XRP",
            AssetSymbol::Ltc => "LTC",
            AssetSymbol::Dot => "DOT",
        }
    }

    pub fn is_stablecoin(&self) -> bool {
        matches!(self, AssetSymbol::Usdt)
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetSymbol::ALL
            .iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown asset symbol: '{}'", s))
    }
}

// =============================================================================
// PriceQuote
// =============================================================================

/// Price of one asset on one exchange.
///
/// `price` is `None` when the quote is unavailable (no symbol mapping,
/// transport failure, or an unparsable body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub asset: AssetSymbol,
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PriceQuote {
    pub fn new(asset: AssetSymbol, price: Option<f64>) -> Self {
        let note = asset.is_stablecoin().then(|| STABLECOIN_NOTE.to_string());
        Self { asset, price, note }
    }

    pub fn unavailable(asset: AssetSymbol) -> Self {
        Self::new(asset, None)
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.price.is_some()
    }
}

// =============================================================================
// ExchangeSnapshot
// =============================================================================

/// One polling cycle's quotes for one exchange, keyed by asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSnapshot {
    pub exchange: String,
    pub quotes: BTreeMap<AssetSymbol, PriceQuote>,
}

impl ExchangeSnapshot {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            quotes: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, quote: PriceQuote) {
        self.quotes.insert(quote.asset, quote);
    }

    /// Available price for an asset, `None` when missing or unavailable.
    pub fn price(&self, asset: AssetSymbol) -> Option<f64> {
        self.quotes.get(&asset).and_then(|q| q.price)
    }
}

/// Validate a parsed number as a usable price.
#[inline]
pub(crate) fn valid_price(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_symbol_serde_names() {
        let json = serde_json::to_string(&AssetSymbol::Solana).unwrap();
        assert_eq!(json, "\"SOLANA\"");
        let asset: AssetSymbol = serde_json::from_str("\"BTC\"").unwrap();
        assert_eq!(asset, AssetSymbol::Btc);
    }

    #[test]
    fn test_asset_symbol_from_str_case_insensitive() {
        assert_eq!("ton".parse::<AssetSymbol>().unwrap(), AssetSymbol::Ton);
        assert_eq!("Xrp".parse::<AssetSymbol>().unwrap(), AssetSymbol::Xrp);
        assert!("DOGE".parse::<AssetSymbol>().is_err());
    }

    #[test]
    fn test_stablecoin_note() {
        let quote = PriceQuote::new(AssetSymbol::Usdt, Some(1.0001));
        assert_eq!(quote.note.as_deref(), Some(STABLECOIN_NOTE));

        let quote = PriceQuote::new(AssetSymbol::Btc, Some(67000.0));
        assert!(quote.note.is_none());
    }

    #[test]
    fn test_snapshot_price_lookup() {
        let mut snapshot = ExchangeSnapshot::new("Binance");
        snapshot.insert(PriceQuote::new(AssetSymbol::Btc, Some(67000.5)));
        snapshot.insert(PriceQuote::unavailable(AssetSymbol::Eth));

        assert_eq!(snapshot.price(AssetSymbol::Btc), Some(67000.5));
        assert_eq!(snapshot.price(AssetSymbol::Eth), None);
        assert_eq!(snapshot.price(AssetSymbol::Ton), None);
    }

    #[test]
    fn test_valid_price_rejects_nan_and_negative() {
        assert_eq!(valid_price(0.0), Some(0.0));
        assert_eq!(valid_price(12.5), Some(12.5));
        assert_eq!(valid_price(f64::NAN), None);
        assert_eq!(valid_price(f64::INFINITY), None);
        assert_eq!(valid_price(-1.0), None);
    }
}
