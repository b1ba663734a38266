//! Response shape dispatch
//!
//! Every exchange answers in its own JSON layout. `ResponseShape` names the
//! layout a descriptor expects and routes the body to the matching parser,
//! so all adapters share one signature: `parse(body, native) -> Option<f64>`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::types::valid_price;
use crate::adapters::{binance, bybit, htx, tonapi};

/// Exchange-specific JSON layout of a price response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// `{"symbol": "BTCUSDT", "price": "67000.50"}`
    Binance,
    /// `{"result": {"list": [{"symbol": "BTCUSDT", "lastPrice": "67010.00"}]}}`
    Bybit,
    /// `{"data": [{"symbol": "btcusdt", "close": 67005.1}]}`
    Htx,
    /// `{"rates": {"TON": {"prices": {"USD": 5.41}}}}`
    TonRates,
}

impl ResponseShape {
    /// Extract the price of `native` from a decoded body.
    ///
    /// Returns `None` when the expected fields are missing or the value is
    /// not a finite, non-negative number.
    pub fn parse(&self, body: &Value, native: &str) -> Option<f64> {
        match self {
            ResponseShape::Binance => binance::parse_ticker(body, native),
            ResponseShape::Bybit => bybit::parse_tickers(body, native),
            ResponseShape::Htx => htx::parse_tickers(body, native),
            ResponseShape::TonRates => tonapi::parse_rates(body, native),
        }
    }
}

impl std::fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseShape::Binance => write!(f, "binance"),
            ResponseShape::Bybit => write!(f, "bybit"),
            ResponseShape::Htx => write!(f, "htx"),
            ResponseShape::TonRates => write!(f, "ton_rates"),
        }
    }
}

/// Numeric field that exchanges send either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub fn to_price(&self) -> Option<f64> {
        match self {
            RawNumber::Number(v) => valid_price(*v),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok().and_then(valid_price),
        }
    }
}
