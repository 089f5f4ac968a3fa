//! Data models shared across the aggregation pipeline and the API surface.

mod block;

pub use block::{EnrichedBlock, UNKNOWN_MINER};
