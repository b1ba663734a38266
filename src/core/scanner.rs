//! Upbit/Binance arbitrage scanner
//!
//! One scan:
//! 1. Upbit market list + KRW rate, concurrently
//! 2. Upbit KRW tickers + Binance USDT tickers for the allowed pairs, concurrently
//! 3. One `ArbitrageRow` per pair quoted on both venues
//!
//! The KRW rate never fails the scan (it falls back to the configured
//! default). Missing markets or a failed price leg fail the whole scan.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, warn};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::{binance, upbit, QuoteClient};
use crate::config::ArbitrageConfig;
use crate::core::arbitrage::{derive_krw_rate, SpreadCalculator};
use crate::core::scheduler::PollJob;
use crate::core::types::{ArbitrageReport, FxRate};
use crate::error::Result as AppResult;

/// Cycle-wide arbitrage failures.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No valid market pairs found")]
    NoMarkets,

    #[error("{venue} request failed: {source}")]
    Upstream {
        venue: &'static str,
        #[source]
        source: ExchangeError,
    },

    #[error("{venue} returned an unexpected payload")]
    InvalidPayload { venue: &'static str },
}

impl ScanError {
    fn upstream(venue: &'static str) -> impl FnOnce(ExchangeError) -> ScanError {
        move |source| ScanError::Upstream { venue, source }
    }
}

pub struct ArbitrageScanner {
    client: QuoteClient,
    config: ArbitrageConfig,
    calculator: SpreadCalculator,
}

impl ArbitrageScanner {
    pub fn new(client: QuoteClient, config: ArbitrageConfig) -> Self {
        let calculator = SpreadCalculator::new(config.fees, config.threshold_pct);
        Self {
            client,
            config,
            calculator,
        }
    }

    pub async fn scan(&self) -> Result<ArbitrageReport, ScanError> {
        let (markets, fx) = tokio::join!(self.fetch_krw_markets(), self.fetch_fx_rate());
        let markets = markets?;

        let pairs: Vec<String> = markets
            .into_iter()
            .filter(|m| self.config.markets.contains(m))
            .collect();
        if pairs.is_empty() {
            return Err(ScanError::NoMarkets);
        }

        let (upbit_prices, binance_prices) = tokio::join!(
            self.fetch_upbit_prices(&pairs),
            self.fetch_binance_prices(&pairs)
        );
        let upbit_prices = upbit_prices?;
        let binance_prices = binance_prices?;

        let rows = pairs
            .iter()
            .filter_map(|market| {
                let krw = *upbit_prices.get(market)?;
                let symbol = upbit::usdt_symbol(market);
                let Some(&binance_price) = binance_prices.get(&symbol) else {
                    debug!(market = %market, symbol = %symbol, "Not quoted on Binance, skipping");
                    return None;
                };
                self.calculator
                    .compute(&symbol, krw / fx.krw_per_usd, binance_price)
            })
            .collect();

        Ok(ArbitrageReport {
            fx,
            fees: self.calculator.fees(),
            threshold_pct: self.calculator.threshold_pct(),
            pairs,
            rows,
        })
    }

    async fn fetch_krw_markets(&self) -> Result<Vec<String>, ScanError> {
        let url = endpoint(&self.config.upbit_url, "market/all").map_err(ScanError::upstream(upbit::NAME))?;
        let body = self
            .client
            .get_json::<&str, &str>(url, &[])
            .await
            .map_err(ScanError::upstream(upbit::NAME))?;
        upbit::parse_krw_markets(&body).ok_or(ScanError::InvalidPayload { venue: upbit::NAME })
    }

    async fn fetch_upbit_prices(&self, markets: &[String]) -> Result<BTreeMap<String, f64>, ScanError> {
        let body = self
            .upbit_ticker(&markets.join(","))
            .await
            .map_err(ScanError::upstream(upbit::NAME))?;
        upbit::parse_trade_prices(&body).ok_or(ScanError::InvalidPayload { venue: upbit::NAME })
    }

    /// Batch ticker for every pair's USDT symbol.
    ///
    /// Binance rejects the whole batch with a 400 when one symbol is not
    /// listed, so that case falls back to one request per symbol and drops
    /// the symbols that fail.
    async fn fetch_binance_prices(&self, markets: &[String]) -> Result<BTreeMap<String, f64>, ScanError> {
        let symbols: Vec<String> = markets.iter().map(|m| upbit::usdt_symbol(m)).collect();
        let quoted: Vec<String> = symbols.iter().map(|s| format!("\"{}\"", s)).collect();

        match self.binance_ticker("symbols", &format!("[{}]", quoted.join(","))).await {
            Ok(body) => {
                binance::parse_ticker_list(&body).ok_or(ScanError::InvalidPayload { venue: binance::NAME })
            }
            Err(ExchangeError::HttpStatus { status: 400, body }) => {
                warn!(venue = binance::NAME, body = %body, "Batch ticker rejected, querying symbols one by one");
                Ok(self.fetch_binance_prices_each(&symbols).await)
            }
            Err(e) => Err(ScanError::upstream(binance::NAME)(e)),
        }
    }

    async fn fetch_binance_prices_each(&self, symbols: &[String]) -> BTreeMap<String, f64> {
        let results = join_all(symbols.iter().map(|symbol| async move {
            let price = match self.binance_ticker("symbol", symbol).await {
                Ok(body) => binance::parse_ticker(&body, symbol),
                Err(e) => {
                    debug!(symbol = %symbol, error = %e, "Binance ticker failed, skipping");
                    None
                }
            };
            price.map(|p| (symbol.clone(), p))
        }))
        .await;

        results.into_iter().flatten().collect()
    }

    /// Live KRW rate, or the configured default when either leg fails.
    pub async fn fetch_fx_rate(&self) -> FxRate {
        let (btc_krw, btc_usdt) = tokio::join!(
            self.upbit_ticker("KRW-BTC"),
            self.binance_ticker("symbol", "BTCUSDT")
        );

        let btc_krw = match btc_krw {
            Ok(body) => upbit::parse_trade_prices(&body).and_then(|p| p.get("KRW-BTC").copied()),
            Err(e) => {
                warn!(venue = upbit::NAME, error = %e, "KRW-BTC ticker failed");
                None
            }
        };
        let btc_usdt = match btc_usdt {
            Ok(body) => binance::parse_ticker(&body, "BTCUSDT"),
            Err(e) => {
                warn!(venue = binance::NAME, error = %e, "BTCUSDT ticker failed");
                None
            }
        };

        derive_krw_rate(btc_krw, btc_usdt, self.config.default_krw_rate)
    }

    async fn upbit_ticker(&self, markets: &str) -> ExchangeResult<serde_json::Value> {
        let url = endpoint(&self.config.upbit_url, "ticker")?;
        self.client.get_json(url, &[("markets", markets)]).await
    }

    async fn binance_ticker(&self, param: &str, value: &str) -> ExchangeResult<serde_json::Value> {
        let url = endpoint(&self.config.binance_url, "ticker/price")?;
        self.client.get_json(url, &[(param, value)]).await
    }
}

#[async_trait]
impl PollJob for ArbitrageScanner {
    type Output = ArbitrageReport;

    fn name(&self) -> &str {
        "arbitrage"
    }

    async fn run(&self) -> AppResult<ArbitrageReport> {
        Ok(self.scan().await?)
    }
}

/// `base` + `/` + `path`, tolerating a trailing slash on `base`.
fn endpoint(base: &str, path: &str) -> ExchangeResult<Url> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|e| ExchangeError::InvalidDescriptor {
        exchange: base.to_string(),
        reason: format!("endpoint '{}': {}", raw, e),
    })
}
