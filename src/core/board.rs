//! Rates board polling job: one aggregation plus best-rate highlight per cycle.

use async_trait::async_trait;

use crate::adapters::descriptor::ExchangeDescriptor;
use crate::adapters::types::AssetSymbol;
use crate::core::aggregator::{best_rates, PriceAggregator};
use crate::core::scheduler::PollJob;
use crate::core::types::RatesBoard;
use crate::error::{AppError, Result};

pub struct BoardPoller {
    aggregator: PriceAggregator,
    descriptors: Vec<ExchangeDescriptor>,
    assets: Vec<AssetSymbol>,
}

impl BoardPoller {
    pub fn new(
        aggregator: PriceAggregator,
        descriptors: Vec<ExchangeDescriptor>,
        assets: Vec<AssetSymbol>,
    ) -> Self {
        Self {
            aggregator,
            descriptors,
            assets,
        }
    }

    pub async fn poll(&self) -> RatesBoard {
        let snapshots = self.aggregator.aggregate(&self.descriptors, &self.assets).await;
        let best = best_rates(&snapshots, &self.assets);
        RatesBoard {
            assets: self.assets.clone(),
            snapshots,
            best,
        }
    }
}

#[async_trait]
impl PollJob for BoardPoller {
    type Output = RatesBoard;

    fn name(&self) -> &str {
        "rates_board"
    }

    /// Fails only when no configured exchange produced a single price.
    async fn run(&self) -> Result<RatesBoard> {
        let board = self.poll().await;
        if !self.descriptors.is_empty() && board.best.is_empty() {
            return Err(AppError::Api(
                "No exchange returned a usable price".to_string(),
            ));
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{binance, QuoteClient};
    use mockito::Matcher;

    fn poller_at(server: &mockito::ServerGuard, assets: Vec<AssetSymbol>) -> BoardPoller {
        let mut descriptor = binance::descriptor();
        descriptor.endpoint = format!("{}/api/v3/ticker/price", server.url());
        BoardPoller::new(
            PriceAggregator::new(QuoteClient::new(2_000).unwrap()),
            vec![descriptor],
            assets,
        )
    }

    #[tokio::test]
    async fn test_poll_builds_board() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v3/ticker/price")
            .match_query(Matcher::UrlEncoded("symbol".into(), "BTCUSDT".into()))
            .with_status(200)
            .with_body(r#"{"symbol":"BTCUSDT","price":"67000.50"}"#)
            .create_async()
            .await;

        let poller = poller_at(&server, vec![AssetSymbol::Btc]);
        let board = poller.run().await.unwrap();

        assert_eq!(board.assets, vec![AssetSymbol::Btc]);
        assert_eq!(board.snapshots.len(), 1);
        assert_eq!(board.best[&AssetSymbol::Btc].exchange, "Binance");
    }

    #[tokio::test]
    async fn test_run_fails_without_any_price() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v3/ticker/price")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let poller = poller_at(&server, vec![AssetSymbol::Btc, AssetSymbol::Eth]);
        let err = poller.run().await.unwrap_err();
        assert!(err.to_string().contains("No exchange returned a usable price"));

        // the degraded board itself is still well-formed
        let board = poller.poll().await;
        assert_eq!(board.snapshots[0].quotes.len(), 2);
        assert!(board.best.is_empty());
    }
}
