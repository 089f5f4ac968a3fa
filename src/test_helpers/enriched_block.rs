//! Quick construction of `EnrichedBlock` fixtures.

use crate::models::EnrichedBlock;

use super::{BlockInfoBuilder, BlockStatsBuilder};

/// Creates an `EnrichedBlock` at `height` with the given hash and otherwise
/// default fields.
pub fn create_test_enriched_block(height: u64, hash: &str) -> EnrichedBlock {
    EnrichedBlock::from_parts(
        BlockInfoBuilder::new().height(height).hash(hash).time(height * 600).build(),
        BlockStatsBuilder::new().build(),
        "pool.example".to_string(),
        Some(65_000.0),
    )
}
