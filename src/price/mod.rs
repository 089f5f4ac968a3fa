//! Historical USD price lookup for block timestamps.

mod client;

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

pub use client::HistoricalPriceClient;

/// Custom error type for price lookup operations.
///
/// None of these errors ever reach a caller of the aggregator: a failed
/// lookup degrades the affected block's price to "unknown".
#[derive(Error, Debug)]
pub enum PriceLookupError {
    /// The lookup did not complete within the configured deadline.
    #[error("Price lookup timed out after {0:?}")]
    Timeout(Duration),

    /// The price endpoint answered with a non-success status.
    #[error("Price endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    /// Error in the HTTP transport or its retry middleware.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// Error decoding the HTTP response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered but the payload did not carry a usable price.
    #[error("Malformed price payload: {0}")]
    Malformed(String),
}

/// A trait for resolving the USD price at a given moment in the past.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceLookup: Send + Sync {
    /// Returns the historical USD price closest to `timestamp`.
    async fn price_at(&self, timestamp: u64) -> Result<f64, PriceLookupError>;
}
