//! HTTP quote client
//!
//! Wraps one shared `reqwest::Client` with a fixed per-request timeout.
//! `fetch_quote` is the adapter contract: it never fails, every anomaly
//! degrades to an unavailable quote plus a log line.

use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::descriptor::ExchangeDescriptor;
use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{AssetSymbol, PriceQuote};

/// Default request timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Maximum body length echoed into error messages
const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    timeout_ms: u64,
}

impl QuoteClient {
    pub fn new(timeout_ms: u64) -> ExchangeResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ExchangeError::RequestFailed(format!("HTTP client init: {}", e)))?;
        Ok(Self { http, timeout_ms })
    }

    /// GET `url` with `query` and decode the body as JSON.
    pub async fn get_json<K, V>(&self, url: Url, query: &[(K, V)]) -> ExchangeResult<Value>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_ref(), v.as_ref())).collect();

        let response = self
            .http
            .get(url)
            .query(&pairs)
            .send()
            .await
            .map_err(|e| ExchangeError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::from_reqwest(e, self.timeout_ms))?;

        if !status.is_success() {
            return Err(ExchangeError::HttpStatus {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            ExchangeError::InvalidResponse(format!("{} - body: {}", e, preview(&body)))
        })
    }

    /// Fetch one asset's price from one exchange.
    ///
    /// Unmapped assets return an unavailable quote without a request.
    pub async fn fetch_quote(
        &self,
        descriptor: &ExchangeDescriptor,
        asset: AssetSymbol,
    ) -> PriceQuote {
        let Some(native) = descriptor.native_symbol(asset) else {
            debug!(exchange = %descriptor.name, asset = %asset, "No symbol mapping, skipping");
            return PriceQuote::unavailable(asset);
        };

        match self.try_fetch_price(descriptor, native).await {
            Ok(Some(price)) => PriceQuote::new(asset, Some(price)),
            Ok(None) => {
                warn!(
                    exchange = %descriptor.name,
                    asset = %asset,
                    symbol = native,
                    shape = %descriptor.shape,
                    "Response missing expected price fields"
                );
                PriceQuote::unavailable(asset)
            }
            Err(e) => {
                warn!(
                    exchange = %descriptor.name,
                    asset = %asset,
                    symbol = native,
                    error = %e,
                    "Quote fetch failed"
                );
                PriceQuote::unavailable(asset)
            }
        }
    }

    async fn try_fetch_price(
        &self,
        descriptor: &ExchangeDescriptor,
        native: &str,
    ) -> ExchangeResult<Option<f64>> {
        let url = descriptor.endpoint_url()?;
        let body = self.get_json(url, &descriptor.query_for(native)).await?;
        Ok(descriptor.shape.parse(&body, native))
    }
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_PREVIEW) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
