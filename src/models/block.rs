//! This module defines the `EnrichedBlock` structure, the merged view of a
//! block that the aggregator produces and the API serves.

use serde::{Serialize, Serializer};

use crate::providers::rpc::{BlockInfo, BlockStats};

/// Sentinel miner identity used when the coinbase payout address cannot be
/// resolved. The wire format never carries a null or empty miner field.
pub const UNKNOWN_MINER: &str = "Unknown";

/// Serializes an optional USD price, emitting `0` for an unresolved price.
///
/// Downstream consumers treat `0` as "price unknown"; a real price of exactly
/// zero does not occur for any timestamp the chain can produce.
fn serialize_price_usd<S>(price: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(price.unwrap_or(0.0))
}

/// A single block enriched with fee statistics, the resolved miner identity,
/// and a historical USD price.
///
/// Immutable once constructed: the aggregator builds each instance in one pass
/// and never touches it again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedBlock {
    /// Sequential index of the block from the chain's origin.
    pub height: u64,
    /// Block hash.
    pub hash: String,
    /// Chain-reported Unix timestamp. May be noisy across adjacent blocks.
    pub time: u64,
    /// Number of transactions in the block, including the coinbase.
    pub tx_count: u64,
    /// Serialized block size in bytes.
    pub size_bytes: u64,
    /// Block weight in weight units.
    pub weight_units: u64,
    /// Minimum fee rate paid by any transaction in the block.
    pub min_fee_rate: u64,
    /// Maximum fee rate paid by any transaction in the block.
    pub max_fee_rate: u64,
    /// Average fee rate across the block's transactions.
    pub avg_fee_rate: u64,
    /// Median (50th percentile) fee rate.
    pub median_fee_rate: u64,
    /// Fee rate distribution: 10th, 25th, 50th, 75th and 90th percentiles.
    pub fee_rate_percentiles: [u64; 5],
    /// Newly issued reward for mining the block, excluding fees.
    pub subsidy: u64,
    /// Sum of all transaction fees in the block.
    pub total_fee: u64,
    /// Sum of all output amounts in the block.
    pub total_output: u64,
    /// Resolved coinbase payout address, or [`UNKNOWN_MINER`].
    pub miner: String,
    /// Historical USD price at the block's timestamp. `None` when the lookup
    /// failed; serialized as `0` on the wire.
    #[serde(serialize_with = "serialize_price_usd")]
    pub price_usd: Option<f64>,
}

impl EnrichedBlock {
    /// Merges block data, block statistics, a resolved miner and an optional
    /// price into one record.
    pub fn from_parts(
        block: BlockInfo,
        stats: BlockStats,
        miner: String,
        price_usd: Option<f64>,
    ) -> Self {
        Self {
            height: block.height,
            hash: block.hash,
            time: block.time,
            tx_count: block.n_tx,
            size_bytes: block.size,
            weight_units: block.weight,
            min_fee_rate: stats.min_fee_rate,
            max_fee_rate: stats.max_fee_rate,
            avg_fee_rate: stats.avg_fee_rate,
            median_fee_rate: stats.fee_rate_percentiles[2],
            fee_rate_percentiles: stats.fee_rate_percentiles,
            subsidy: stats.subsidy,
            total_fee: stats.total_fee,
            total_output: stats.total_output,
            miner,
            price_usd,
        }
    }
}
