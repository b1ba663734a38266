//! HTX (Huobi) market tickers
//!
//! `GET /market/tickers/` returns every ticker at once; symbols are
//! lowercase (`btcusdt`).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::descriptor::ExchangeDescriptor;
use crate::adapters::shape::{RawNumber, ResponseShape};
use crate::adapters::types::AssetSymbol;

pub const NAME: &str = "HTX (Huobi)";
pub const TICKERS_URL: &str = "https://api.huobi.pro/market/tickers/";

#[derive(Debug, Deserialize)]
struct TickersResponse {
    data: Option<Vec<Ticker>>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    symbol: String,
    close: Option<RawNumber>,
}

/// Close price of `native` (case-insensitive symbol match).
pub fn parse_tickers(body: &Value, native: &str) -> Option<f64> {
    TickersResponse::deserialize(body)
        .ok()?
        .data?
        .into_iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(native))?
        .close?
        .to_price()
}

pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        name: NAME.to_string(),
        endpoint: TICKERS_URL.to_string(),
        shape: ResponseShape::Htx,
        params: BTreeMap::new(),
        symbol_param: None,
        symbols: BTreeMap::from([
            (AssetSymbol::Btc, "btcusdt".to_string()),
            (AssetSymbol::Eth, "ethusdt".to_string()),
            (AssetSymbol::Usdt, "usdtusd".to_string()),
            (AssetSymbol::Ltc, "ltcusdt".to_string()),
            (AssetSymbol::Xrp, "xrpusdt".to_string()),
            (AssetSymbol::Ton, "tonusdt".to_string()),
            (AssetSymbol::Solana, "solusdt".to_string()),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_numeric_close() {
        let body = json!({
            "status": "ok",
            "data": [
                {"symbol": "ethusdt", "close": 3499.5},
                {"symbol": "btcusdt", "close": 67005.1}
            ]
        });
        assert_eq!(parse_tickers(&body, "btcusdt"), Some(67005.1));
    }

    #[test]
    fn test_parse_case_insensitive_symbol() {
        let body = json!({"data": [{"symbol": "BTCUSDT", "close": 1.5}]});
        assert_eq!(parse_tickers(&body, "btcusdt"), Some(1.5));
    }

    #[test]
    fn test_parse_error_status() {
        let body = json!({"status": "error", "err-msg": "invalid"});
        assert_eq!(parse_tickers(&body, "btcusdt"), None);
    }
}
