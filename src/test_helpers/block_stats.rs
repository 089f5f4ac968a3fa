//! Builder for `BlockStats` test fixtures.

use crate::providers::rpc::BlockStats;

/// Builds `BlockStats` values with sensible defaults for tests.
#[derive(Debug, Clone)]
pub struct BlockStatsBuilder {
    stats: BlockStats,
}

impl Default for BlockStatsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStatsBuilder {
    /// Creates a builder with a plausible fee distribution.
    pub fn new() -> Self {
        Self {
            stats: BlockStats {
                min_fee_rate: 1,
                max_fee_rate: 600,
                avg_fee_rate: 24,
                fee_rate_percentiles: [2, 5, 11, 24, 60],
                subsidy: 312_500_000,
                total_fee: 15_000_000,
                total_output: 542_000_000_000,
            },
        }
    }

    /// Sets the fee rate percentiles.
    pub fn fee_rate_percentiles(mut self, percentiles: [u64; 5]) -> Self {
        self.stats.fee_rate_percentiles = percentiles;
        self
    }

    /// Sets the block subsidy.
    pub fn subsidy(mut self, subsidy: u64) -> Self {
        self.stats.subsidy = subsidy;
        self
    }

    /// Sets the total fees.
    pub fn total_fee(mut self, total_fee: u64) -> Self {
        self.stats.total_fee = total_fee;
        self
    }

    /// Builds the `BlockStats`.
    pub fn build(self) -> BlockStats {
        self.stats
    }
}
