//! Binance spot REST payloads
//!
//! - `GET /api/v3/ticker/price?symbol=BTCUSDT` → single ticker object
//! - `GET /api/v3/ticker/price?symbols=["BTCUSDT","ETHUSDT"]` → ticker array

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::descriptor::ExchangeDescriptor;
use crate::adapters::shape::{RawNumber, ResponseShape};
use crate::adapters::types::AssetSymbol;

pub const NAME: &str = "Binance";
pub const TICKER_PRICE_URL: &str = "https://api.binance.com/api/v3/ticker/price";

#[derive(Debug, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: RawNumber,
}

#[derive(Debug, Deserialize)]
struct SingleTicker {
    price: RawNumber,
}

/// Price from a single-symbol ticker response.
pub fn parse_ticker(body: &Value, _native: &str) -> Option<f64> {
    SingleTicker::deserialize(body).ok()?.price.to_price()
}

/// Prices from a batch ticker response, keyed by symbol.
///
/// Entries with an unparsable price are left out.
pub fn parse_ticker_list(body: &Value) -> Option<BTreeMap<String, f64>> {
    let tickers = Vec::<TickerPrice>::deserialize(body).ok()?;
    Some(
        tickers
            .into_iter()
            .filter_map(|t| t.price.to_price().map(|p| (t.symbol, p)))
            .collect(),
    )
}

/// Default Binance descriptor (USDT-quoted spot pairs).
pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        name: NAME.to_string(),
        endpoint: TICKER_PRICE_URL.to_string(),
        shape: ResponseShape::Binance,
        params: BTreeMap::new(),
        symbol_param: Some("symbol".to_string()),
        symbols: BTreeMap::from([
            (AssetSymbol::Btc, "BTCUSDT".to_string()),
            (AssetSymbol::Eth, "ETHUSDT".to_string()),
            (AssetSymbol::Usdt, "BUSDUSDT".to_string()),
            (AssetSymbol::Ltc, "LTCUSDT".to_string()),
            (AssetSymbol::Xrp, "XRPUSDT".to_string()),
            (AssetSymbol::Ton, "TONUSDT".to_string()),
            (AssetSymbol::Solana, "SOLUSDT".to_string()),
            (AssetSymbol::Dot, "DOTUSDT".to_string()),
        ]),
    }
}
