//! Exchange adapter error types
//!
//! All exchange-related errors are wrapped in ExchangeError enum
//! which implements thiserror for consistent error handling.

use thiserror::Error;

/// Exchange-specific error types for quote fetching
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Request could not be sent or the body could not be read
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Network operation timed out
    #[error("Network timeout after {0}ms")]
    NetworkTimeout(u64),

    /// Exchange answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Invalid or unexpected response from exchange
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Descriptor cannot be used to build requests (bad endpoint, empty name)
    #[error("Invalid descriptor for {exchange}: {reason}")]
    InvalidDescriptor { exchange: String, reason: String },
}

impl ExchangeError {
    /// Map a reqwest failure, keeping timeouts distinguishable.
    pub fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ExchangeError::NetworkTimeout(timeout_ms)
        } else {
            ExchangeError::RequestFailed(err.to_string())
        }
    }
}

/// Result type alias for exchange operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;
