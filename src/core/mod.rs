//! Core module - aggregation, arbitrage scanning, polling scheduler
//!
//! This module uses **explicit re-exports** instead of glob exports
//! (`pub use module::*`) to keep the public API visible.
//!
//! ## Usage
//! Prefer importing from `crate::core`:
//! ```ignore
//! use crate::core::{PollingScheduler, PriceAggregator, RatesBoard};
//! ```

pub mod aggregator;
pub mod arbitrage;
pub mod board;
pub mod scanner;
pub mod scheduler;
pub mod types;

// Explicit re-exports for aggregator module
pub use aggregator::{best_rate, best_rates, PriceAggregator};

// Explicit re-exports for arbitrage module
pub use arbitrage::{derive_krw_rate, SpreadCalculator};

// Explicit re-exports for board module
pub use board::BoardPoller;

// Explicit re-exports for scanner module
pub use scanner::{ArbitrageScanner, ScanError};

// Explicit re-exports for scheduler module
pub use scheduler::{PollJob, PollingScheduler, Published, SchedulerHandle};

// Explicit re-exports for types module
pub use types::{
    ArbitrageReport, ArbitrageRow, BestRate, FeeSchedule, FxRate, RateSource, RatesBoard,
    SpreadDirection,
};
