//! Upbit REST payloads (KRW markets)
//!
//! - `GET /v1/market/all` → `[{"market": "KRW-BTC", ...}]`
//! - `GET /v1/ticker?markets=KRW-BTC,KRW-ETH` → `[{"market": "KRW-BTC", "trade_price": 95000000.0}]`

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::shape::RawNumber;

pub const NAME: &str = "Upbit";
pub const API_URL: &str = "https://api.upbit.com/v1";
/// Prefix of KRW-quoted markets
pub const KRW_PREFIX: &str = "KRW-";

#[derive(Debug, Deserialize)]
struct Market {
    market: String,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    market: String,
    trade_price: Option<RawNumber>,
}

/// KRW market codes from a `/market/all` response, in listing order.
pub fn parse_krw_markets(body: &Value) -> Option<Vec<String>> {
    let markets = Vec::<Market>::deserialize(body).ok()?;
    Some(
        markets
            .into_iter()
            .map(|m| m.market)
            .filter(|m| m.starts_with(KRW_PREFIX))
            .collect(),
    )
}

/// Trade prices (KRW) from a `/ticker` response, keyed by market code.
pub fn parse_trade_prices(body: &Value) -> Option<BTreeMap<String, f64>> {
    let tickers = Vec::<Ticker>::deserialize(body).ok()?;
    Some(
        tickers
            .into_iter()
            .filter_map(|t| {
                let price = t.trade_price?.to_price()?;
                Some((t.market, price))
            })
            .collect(),
    )
}

/// `KRW-SOL` → `SOLUSDT`
pub fn usdt_symbol(market: &str) -> String {
    format!("{}USDT", market.trim_start_matches(KRW_PREFIX))
}
