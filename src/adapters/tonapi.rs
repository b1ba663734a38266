//! TON price oracle (tonapi.io rates)
//!
//! `GET /v2/rates?tokens=ton&currencies=usd` →
//! `{"rates": {"TON": {"prices": {"USD": 5.41}}}}`

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::descriptor::ExchangeDescriptor;
use crate::adapters::shape::{RawNumber, ResponseShape};
use crate::adapters::types::AssetSymbol;

pub const NAME: &str = "Telegram Wallet (TON)";
pub const RATES_URL: &str = "https://tonapi.io/v2/rates";
/// Quote currency requested from the oracle
pub const QUOTE_CURRENCY: &str = "usd";

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: Option<BTreeMap<String, TokenRates>>,
}

#[derive(Debug, Deserialize)]
struct TokenRates {
    prices: Option<BTreeMap<String, RawNumber>>,
}

/// USD price of the token named `native`.
///
/// Token and currency keys are matched case-insensitively.
pub fn parse_rates(body: &Value, native: &str) -> Option<f64> {
    let rates = RatesResponse::deserialize(body).ok()?.rates?;
    let (_, token) = rates
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(native))?;
    let (_, price) = token
        .prices?
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(QUOTE_CURRENCY))?;
    price.to_price()
}

pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        name: NAME.to_string(),
        endpoint: RATES_URL.to_string(),
        shape: ResponseShape::TonRates,
        params: BTreeMap::from([("currencies".to_string(), QUOTE_CURRENCY.to_string())]),
        symbol_param: Some("tokens".to_string()),
        symbols: BTreeMap::from([
            (AssetSymbol::Ton, "ton".to_string()),
            (AssetSymbol::Solana, "solana".to_string()),
            (AssetSymbol::Btc, "btc".to_string()),
            (AssetSymbol::Eth, "eth".to_string()),
            (AssetSymbol::Usdt, "usdt".to_string()),
            (AssetSymbol::Ltc, "ltc".to_string()),
            (AssetSymbol::Xrp, "xrp".to_string()),
        ]),
    }
}
