//! Price aggregator: one snapshot per exchange per polling cycle.
//!
//! Every (exchange, asset) pair is fetched concurrently. A failing asset
//! degrades to an unavailable quote; a failing exchange is dropped from the
//! cycle. `aggregate` itself never fails.

use std::collections::BTreeMap;
use std::time::Instant;

use futures_util::future::join_all;
use tracing::{debug, error};

use crate::adapters::descriptor::ExchangeDescriptor;
use crate::adapters::errors::ExchangeResult;
use crate::adapters::types::{AssetSymbol, ExchangeSnapshot};
use crate::adapters::QuoteClient;
use crate::core::types::BestRate;

#[derive(Debug, Clone)]
pub struct PriceAggregator {
    client: QuoteClient,
}

impl PriceAggregator {
    pub fn new(client: QuoteClient) -> Self {
        Self { client }
    }

    /// Fetch every asset from one exchange and assemble its snapshot.
    ///
    /// Fails only when the descriptor itself is unusable; per-asset
    /// failures are already folded into unavailable quotes.
    pub async fn build_snapshot(
        &self,
        descriptor: &ExchangeDescriptor,
        assets: &[AssetSymbol],
    ) -> ExchangeResult<ExchangeSnapshot> {
        descriptor.validate()?;

        let quotes = join_all(
            assets
                .iter()
                .map(|&asset| self.client.fetch_quote(descriptor, asset)),
        )
        .await;

        let mut snapshot = ExchangeSnapshot::new(descriptor.name.clone());
        for quote in quotes {
            snapshot.insert(quote);
        }
        Ok(snapshot)
    }

    /// Snapshots for every exchange that could be queried, in descriptor order.
    pub async fn aggregate(
        &self,
        descriptors: &[ExchangeDescriptor],
        assets: &[AssetSymbol],
    ) -> Vec<ExchangeSnapshot> {
        let started = Instant::now();

        let results = join_all(
            descriptors
                .iter()
                .map(|d| async move { (d, self.build_snapshot(d, assets).await) }),
        )
        .await;

        let snapshots: Vec<ExchangeSnapshot> = results
            .into_iter()
            .filter_map(|(descriptor, result)| match result {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    error!(exchange = %descriptor.name, error = %e, "Exchange dropped from cycle");
                    None
                }
            })
            .collect();

        debug!(
            exchanges = snapshots.len(),
            configured = descriptors.len(),
            assets = assets.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregation complete"
        );

        snapshots
    }
}

/// Highest available price for `asset` across snapshots.
///
/// Ties keep the first snapshot seen; unavailable quotes are ignored.
pub fn best_rate(snapshots: &[ExchangeSnapshot], asset: AssetSymbol) -> Option<BestRate> {
    let mut best: Option<BestRate> = None;
    for snapshot in snapshots {
        let Some(price) = snapshot.price(asset) else {
            continue;
        };
        match &best {
            Some(current) if price <= current.price => {}
            _ => {
                best = Some(BestRate {
                    exchange: snapshot.exchange.clone(),
                    price,
                });
            }
        }
    }
    best
}

/// Best rate for every asset that has at least one available price.
pub fn best_rates(
    snapshots: &[ExchangeSnapshot],
    assets: &[AssetSymbol],
) -> BTreeMap<AssetSymbol, BestRate> {
    assets
        .iter()
        .filter_map(|&asset| best_rate(snapshots, asset).map(|best| (asset, best)))
        .collect()
}
