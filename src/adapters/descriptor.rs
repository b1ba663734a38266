//! Exchange descriptors
//!
//! An `ExchangeDescriptor` is the immutable, configuration-time description
//! of one exchange: where to ask, which native symbol each asset maps to,
//! and which response layout to expect.

use std::collections::BTreeMap;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::shape::ResponseShape;
use crate::adapters::types::AssetSymbol;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeDescriptor {
    /// Display name, unique across the board (e.g. "Binance")
    pub name: String,
    /// Price endpoint URL
    pub endpoint: String,
    /// Response layout of the endpoint
    pub shape: ResponseShape,
    /// Fixed query parameters sent with every request (e.g. `category=spot`)
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Query parameter carrying the native symbol; `None` for endpoints that
    /// return every ticker at once
    #[serde(default)]
    pub symbol_param: Option<String>,
    /// Asset → exchange-native symbol
    pub symbols: BTreeMap<AssetSymbol, String>,
}

impl ExchangeDescriptor {
    /// Exchange-native symbol for an asset, if the exchange lists it.
    pub fn native_symbol(&self, asset: AssetSymbol) -> Option<&str> {
        self.symbols.get(&asset).map(String::as_str)
    }

    /// Parse the endpoint into a request URL.
    pub fn endpoint_url(&self) -> ExchangeResult<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| ExchangeError::InvalidDescriptor {
            exchange: self.name.clone(),
            reason: format!("endpoint '{}': {}", self.endpoint, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExchangeError::InvalidDescriptor {
                exchange: self.name.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    /// Query parameters for one native symbol, fixed parameters first.
    pub fn query_for(&self, native: &str) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(param) = &self.symbol_param {
            query.push((param.clone(), native.to_string()));
        }
        query
    }

    /// Check the descriptor can be used to build requests.
    pub fn validate(&self) -> ExchangeResult<()> {
        if self.name.trim().is_empty() {
            return Err(ExchangeError::InvalidDescriptor {
                exchange: self.endpoint.clone(),
                reason: "name cannot be empty".to_string(),
            });
        }
        self.endpoint_url()?;
        if let Some((asset, _)) = self.symbols.iter().find(|(_, s)| s.trim().is_empty()) {
            return Err(ExchangeError::InvalidDescriptor {
                exchange: self.name.clone(),
                reason: format!("empty native symbol for {}", asset),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{binance, bybit, htx, tonapi};

    #[test]
    fn test_builtin_descriptors_are_valid() {
        for d in [
            binance::descriptor(),
            bybit::descriptor(),
            htx::descriptor(),
            tonapi::descriptor(),
        ] {
            assert!(d.validate().is_ok(), "{} should be valid", d.name);
        }
    }

    #[test]
    fn test_native_symbol_lookup() {
        let d = htx::descriptor();
        assert_eq!(d.native_symbol(AssetSymbol::Btc), Some("btcusdt"));
        assert_eq!(d.native_symbol(AssetSymbol::Dot), None);
    }

    #[test]
    fn test_query_for_bybit_includes_category_and_symbol() {
        let query = bybit::descriptor().query_for("BTCUSDT");
        assert_eq!(
            query,
            vec![
                ("category".to_string(), "spot".to_string()),
                ("symbol".to_string(), "BTCUSDT".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_for_htx_is_empty() {
        assert!(htx::descriptor().query_for("btcusdt").is_empty());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut d = binance::descriptor();
        d.endpoint = "not a url".to_string();
        let err = d.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid descriptor for Binance"), "Got: {}", err);

        d.endpoint = "ftp://example.com/prices".to_string();
        assert!(d.validate().unwrap_err().to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut d = bybit::descriptor();
        d.name = "  ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_yaml_deserialize() {
        let yaml = r#"
name: Bybit
endpoint: https://api.bybit.com/v5/market/tickers
shape: bybit
params:
  category: spot
symbol_param: symbol
symbols:
  BTC: BTCUSDT
  SOLANA: SOLUSDT
"#;
        let d: ExchangeDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(d.shape, ResponseShape::Bybit);
        assert_eq!(d.native_symbol(AssetSymbol::Solana), Some("SOLUSDT"));
        assert_eq!(d.params.get("category").map(String::as_str), Some("spot"));
    }
}
