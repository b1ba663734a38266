//! Upbit/Binance spread calculation
//!
//! Pure arithmetic: no I/O, no suspension points.
//!
//! - `raw  = (upbit - binance) / binance * 100`
//! - `net  = raw - (fee_upbit + fee_binance)` (all in percent)
//! - `profitable = |net| > threshold`

use tracing::warn;

use crate::core::types::{ArbitrageRow, FeeSchedule, FxRate, RateSource, SpreadDirection};

/// Spread calculator for one fee schedule and profit threshold.
///
/// Fees are percentages subtracted from the spread as percentage points,
/// not scaled by 100: 1000 vs 990 with fees 0.1 + 0.05 nets about 0.8601.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadCalculator {
    fees: FeeSchedule,
    threshold_pct: f64,
}

impl SpreadCalculator {
    pub fn new(fees: FeeSchedule, threshold_pct: f64) -> Self {
        Self {
            fees,
            threshold_pct,
        }
    }

    pub fn fees(&self) -> FeeSchedule {
        self.fees
    }

    pub fn threshold_pct(&self) -> f64 {
        self.threshold_pct
    }

    /// Spread row for one market.
    ///
    /// Returns `None` when the Binance price is not strictly positive or
    /// either price is not finite.
    pub fn compute(
        &self,
        symbol: &str,
        upbit_price_usd: f64,
        binance_price_usd: f64,
    ) -> Option<ArbitrageRow> {
        if !upbit_price_usd.is_finite() || !binance_price_usd.is_finite() || binance_price_usd <= 0.0 {
            return None;
        }

        let raw_difference_pct = (upbit_price_usd - binance_price_usd) / binance_price_usd * 100.0;
        let net_difference_pct = raw_difference_pct - self.fees.total_pct();
        let is_profitable = net_difference_pct.abs() > self.threshold_pct;
        let direction = if net_difference_pct > 0.0 {
            SpreadDirection::SellOnUpbit
        } else {
            SpreadDirection::BuyOnUpbit
        };

        Some(ArbitrageRow {
            symbol: symbol.to_string(),
            upbit_price_usd,
            binance_price_usd,
            raw_difference_pct,
            net_difference_pct,
            is_profitable,
            direction,
        })
    }
}

/// KRW per USD from the BTC price on both venues.
///
/// Falls back to `default_rate` when either leg is missing or the ratio is
/// not a usable positive number.
pub fn derive_krw_rate(
    upbit_btc_krw: Option<f64>,
    binance_btc_usdt: Option<f64>,
    default_rate: f64,
) -> FxRate {
    let live = match (upbit_btc_krw, binance_btc_usdt) {
        (Some(krw), Some(usdt)) if usdt > 0.0 => Some(krw / usdt),
        _ => None,
    };

    match live {
        Some(rate) if rate.is_finite() && rate > 0.0 => FxRate {
            krw_per_usd: rate,
            source: RateSource::Live,
        },
        _ => {
            warn!(
                upbit_btc_krw = ?upbit_btc_krw,
                binance_btc_usdt = ?binance_btc_usdt,
                fallback_rate = default_rate,
                "KRW rate unavailable, using default"
            );
            FxRate {
                krw_per_usd: default_rate,
                source: RateSource::Default,
            }
        }
    }
}
