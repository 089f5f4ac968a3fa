//! This module defines the interface for fetching data from an RPC-speaking
//! chain node.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use super::rpc::{BlockInfo, BlockStats, RawTransaction};

/// Custom error type for chain data source operations.
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// Error in the HTTP transport or its retry middleware.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// Error decoding the HTTP response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with an RPC-level error (e.g. unknown block hash).
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// Node-reported error code.
        code: i64,
        /// Node-reported error message.
        message: String,
    },

    /// The RPC envelope carried neither a result nor an error.
    #[error("Empty RPC result for method {0}")]
    EmptyResult(String),
}

/// A trait for a data source that can fetch chain data.
///
/// All operations are idempotent, side-effect-free reads.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Fetches the current chain tip height.
    async fn block_count(&self) -> Result<u64, DataSourceError>;

    /// Fetches the hash of the block at the given height.
    async fn block_hash(&self, height: u64) -> Result<String, DataSourceError>;

    /// Fetches block data (header fields plus transaction ids) by hash.
    async fn block(&self, hash: &str) -> Result<BlockInfo, DataSourceError>;

    /// Fetches per-block fee and amount statistics by hash.
    async fn block_stats(&self, hash: &str) -> Result<BlockStats, DataSourceError>;

    /// Fetches a transaction verbosely, scoped to the block that contains it.
    async fn raw_transaction(
        &self,
        txid: &str,
        block_hash: &str,
    ) -> Result<RawTransaction, DataSourceError>;
}
