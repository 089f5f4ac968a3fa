//! A set of helpers for testing

mod block;
mod block_stats;
mod enriched_block;
mod http_client;
mod transaction;

pub use block::BlockInfoBuilder;
pub use block_stats::BlockStatsBuilder;
pub use enriched_block::create_test_enriched_block;
pub use http_client::create_test_http_client;
pub use transaction::RawTransactionBuilder;
