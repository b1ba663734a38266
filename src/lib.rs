//! Rate Scanner
//!
//! Polls public spot price APIs and publishes:
//! - A rates board: one snapshot per exchange with a best-rate highlight
//! - An Upbit/Binance arbitrage report with fee-adjusted spreads
//!
//! Both are driven by a polling scheduler and served read-only over HTTP.

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod server;

pub use error::AppError;
