//! The TipWatcher polls the chain for a new tip and pushes newly mined
//! blocks into the live feed.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::BlockFeed;
use crate::aggregator::BlockRangeAggregator;
use crate::providers::traits::{ChainDataSource, DataSourceError};

/// Watches the chain tip and publishes each newly mined block into the
/// [`BlockFeed`].
///
/// The first cycle only records the current tip; no historical backfill is
/// attempted. Heights that fail to fetch are skipped the same way the
/// aggregator skips them and will not be retried.
pub struct TipWatcher {
    aggregator: Arc<BlockRangeAggregator>,
    data_source: Arc<dyn ChainDataSource>,
    feed: Arc<BlockFeed>,
    polling_interval: Duration,
    cancellation_token: CancellationToken,
}

impl TipWatcher {
    /// Creates a new `TipWatcher`.
    pub fn new(
        aggregator: Arc<BlockRangeAggregator>,
        data_source: Arc<dyn ChainDataSource>,
        feed: Arc<BlockFeed>,
        polling_interval: Duration,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self { aggregator, data_source, feed, polling_interval, cancellation_token }
    }

    /// Starts the long-running polling loop.
    pub async fn run(self) {
        let mut last_seen: Option<u64> = None;
        loop {
            let polling_delay = tokio::time::sleep(self.polling_interval);

            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("TipWatcher cancellation signal received, shutting down...");
                    break;
                }

                _ = polling_delay => {
                    match self.watch_cycle(last_seen).await {
                        Ok(tip) => last_seen = Some(tip),
                        Err(e) => {
                            tracing::error!(error = %e, "Tip poll failed. Retrying after delay.");
                        }
                    }
                }
            }
        }
        tracing::info!("TipWatcher has shut down.");
    }

    /// Performs one poll cycle and returns the tip to remember for the next
    /// one.
    async fn watch_cycle(&self, last_seen: Option<u64>) -> Result<u64, DataSourceError> {
        let tip = self.data_source.block_count().await?;

        let Some(last) = last_seen else {
            tracing::info!(tip, "Tip watcher primed at current tip.");
            return Ok(tip);
        };
        if tip <= last {
            return Ok(last);
        }

        tracing::debug!(from = last + 1, to = tip, "New blocks observed at the tip.");
        for height in last + 1..=tip {
            if self.cancellation_token.is_cancelled() {
                break;
            }
            if let Some(block) = self.aggregator.fetch_block(height).await {
                self.feed.publish(block).await;
            }
        }

        Ok(tip)
    }
}
