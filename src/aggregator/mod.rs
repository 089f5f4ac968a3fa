//! The Block Range Aggregator: walks the chain backward from its tip,
//! enriches each block with a resolved miner identity and a historical USD
//! price, and returns a clean, height-ordered collection.
//!
//! Partial failures are tolerated at the per-block and per-price granularity;
//! only an unreachable chain tip aborts a request.

mod miner;
mod time_range;

use std::sync::Arc;

use futures::{stream, StreamExt};
use thiserror::Error;

pub use miner::MinerResolver;
pub use time_range::TimeRange;

use crate::models::{EnrichedBlock, UNKNOWN_MINER};
use crate::price::PriceLookup;
use crate::providers::traits::{ChainDataSource, DataSourceError};

/// Custom error type for aggregator operations.
///
/// Everything except the tip query is absorbed internally: failed heights are
/// skipped, failed miner or price resolution degrades the affected field.
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// The chain tip could not be determined, so there is nothing to walk.
    #[error("Chain tip unavailable: {0}")]
    TipUnavailable(#[source] DataSourceError),
}

/// Produces ordered pages of [`EnrichedBlock`] records for a time window.
pub struct BlockRangeAggregator {
    data_source: Arc<dyn ChainDataSource>,
    price_lookup: Arc<dyn PriceLookup>,
    miner_resolver: MinerResolver,
    concurrency: usize,
}

impl BlockRangeAggregator {
    /// Creates a new `BlockRangeAggregator`.
    ///
    /// `concurrency` bounds the number of in-flight height fetches per page
    /// request; the chain node is a single shared upstream, so unbounded
    /// fan-out is avoided.
    pub fn new(
        data_source: Arc<dyn ChainDataSource>,
        price_lookup: Arc<dyn PriceLookup>,
        concurrency: usize,
    ) -> Self {
        let miner_resolver = MinerResolver::new(Arc::clone(&data_source));
        Self { data_source, price_lookup, miner_resolver, concurrency: concurrency.max(1) }
    }

    /// Fetches page `page` of size `limit`, restricted to blocks mined at or
    /// after `cutoff`.
    ///
    /// The page is addressed from the current chain tip: page 1 covers the
    /// `limit` most recent heights, page 2 the `limit` heights below those,
    /// and so on. Heights in the interval are fetched with bounded
    /// concurrency; every height is attempted before the cutoff filter is
    /// applied, so a transient failure near the window boundary cannot cut
    /// the walk short. The result is sorted ascending by height. An empty
    /// result is valid: the page may lie past the chain's length, or the
    /// cutoff may exclude every block in range.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn fetch_page(
        &self,
        page: u64,
        limit: u64,
        cutoff: u64,
    ) -> Result<Vec<EnrichedBlock>, AggregatorError> {
        let page = page.max(1);
        let limit = limit.max(1);

        let tip = self.data_source.block_count().await.map_err(AggregatorError::TipUnavailable)?;

        let start = tip.saturating_sub((page - 1) * limit);
        let end = start.saturating_sub(limit);
        tracing::debug!(tip, start, end, "Walking height interval for page.");

        // Heights h with end < h <= start; the lower bound also keeps the
        // walk above height 0.
        let heights: Vec<u64> = (end + 1..=start).rev().collect();

        let mut blocks: Vec<EnrichedBlock> = stream::iter(heights)
            .map(|height| self.fetch_block(height))
            .buffer_unordered(self.concurrency)
            .filter_map(|block| async move { block })
            .collect()
            .await;

        blocks.sort_unstable_by_key(|block| block.height);
        blocks.retain(|block| block.time >= cutoff);

        tracing::debug!(returned = blocks.len(), requested = limit, "Page assembled.");
        Ok(blocks)
    }

    /// Fetches and enriches the block at one height.
    ///
    /// Returns `None` when the hash, block or statistics fetch fails; the
    /// failure is logged and the height is simply omitted. Miner and price
    /// resolution cannot fail a block.
    pub async fn fetch_block(&self, height: u64) -> Option<EnrichedBlock> {
        match self.fetch_block_inner(height).await {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!(height, error = %e, "Skipping height: block fetch failed.");
                None
            }
        }
    }

    async fn fetch_block_inner(&self, height: u64) -> Result<EnrichedBlock, DataSourceError> {
        let hash = self.data_source.block_hash(height).await?;
        let block = self.data_source.block(&hash).await?;
        let stats = self.data_source.block_stats(&hash).await?;

        let miner = match block.tx.first() {
            Some(coinbase_txid) => self.miner_resolver.resolve(coinbase_txid, &hash).await,
            None => UNKNOWN_MINER.to_string(),
        };

        let price_usd = match self.price_lookup.price_at(block.time).await {
            Ok(price) => Some(price),
            Err(e) => {
                tracing::warn!(height, error = %e, "Price lookup failed, leaving price unset.");
                None
            }
        };

        Ok(EnrichedBlock::from_parts(block, stats, miner, price_usd))
    }
}
