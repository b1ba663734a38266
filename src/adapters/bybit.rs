//! Bybit v5 market tickers
//!
//! `GET /v5/market/tickers?category=spot&symbol=BTCUSDT`

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::descriptor::ExchangeDescriptor;
use crate::adapters::shape::{RawNumber, ResponseShape};
use crate::adapters::types::AssetSymbol;

pub const NAME: &str = "Bybit";
pub const TICKERS_URL: &str = "https://api.bybit.com/v5/market/tickers";

#[derive(Debug, Deserialize)]
struct TickersResponse {
    result: Option<TickersResult>,
}

#[derive(Debug, Deserialize)]
struct TickersResult {
    list: Option<Vec<Ticker>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker {
    symbol: String,
    last_price: Option<RawNumber>,
}

/// Last traded price of `native` from the `result.list` array.
pub fn parse_tickers(body: &Value, native: &str) -> Option<f64> {
    let response = TickersResponse::deserialize(body).ok()?;
    response
        .result?
        .list?
        .into_iter()
        .find(|t| t.symbol == native)?
        .last_price?
        .to_price()
}

/// Default Bybit descriptor (spot category).
pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        name: NAME.to_string(),
        endpoint: TICKERS_URL.to_string(),
        shape: ResponseShape::Bybit,
        params: BTreeMap::from([("category".to_string(), "spot".to_string())]),
        symbol_param: Some("symbol".to_string()),
        symbols: BTreeMap::from([
            (AssetSymbol::Btc, "BTCUSDT".to_string()),
            (AssetSymbol::Eth, "ETHUSDT".to_string()),
            (AssetSymbol::Usdt, "USDCUSDT".to_string()),
            (AssetSymbol::Ltc, "LTCUSDT".to_string()),
            (AssetSymbol::Xrp, "XRPUSDT".to_string()),
            (AssetSymbol::Ton, "TONUSDT".to_string()),
            (AssetSymbol::Solana, "SOLUSDT".to_string()),
            (AssetSymbol::Dot, "DOTUSDT".to_string()),
        ]),
    }
}
