//! Exchange adapters for public spot price APIs
//!
//! Each exchange module knows its endpoint, its native symbol table and its
//! response layout. `QuoteClient::fetch_quote` turns an `ExchangeDescriptor`
//! plus an `AssetSymbol` into a normalized `PriceQuote`.

pub mod binance;
pub mod bybit;
pub mod client;
pub mod descriptor;
pub mod errors;
pub mod htx;
pub mod shape;
pub mod tonapi;
pub mod types;
pub mod upbit;

// Re-export commonly used types for convenience
pub use client::{QuoteClient, DEFAULT_TIMEOUT_MS};
pub use descriptor::ExchangeDescriptor;
pub use errors::{ExchangeError, ExchangeResult};
pub use shape::{RawNumber, ResponseShape};
pub use types::{AssetSymbol, ExchangeSnapshot, PriceQuote, STABLECOIN_NOTE};

/// Built-in descriptors for the rates board, in display order.
pub fn default_descriptors() -> Vec<ExchangeDescriptor> {
    vec![
        binance::descriptor(),
        bybit::descriptor(),
        htx::descriptor(),
        tonapi::descriptor(),
    ]
}
