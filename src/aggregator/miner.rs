//! Resolution of a block's miner identity from its coinbase transaction.

use std::sync::Arc;

use crate::models::UNKNOWN_MINER;
use crate::providers::traits::ChainDataSource;

/// Resolves the payout address credited by a block's coinbase transaction.
///
/// Resolution never fails: any lookup error or unrecognized script shape
/// degrades to the [`UNKNOWN_MINER`] sentinel.
pub struct MinerResolver {
    data_source: Arc<dyn ChainDataSource>,
}

impl MinerResolver {
    /// Creates a new `MinerResolver`.
    pub fn new(data_source: Arc<dyn ChainDataSource>) -> Self {
        Self { data_source }
    }

    /// Returns the payout address of the coinbase transaction's first output,
    /// or [`UNKNOWN_MINER`] if it cannot be determined.
    pub async fn resolve(&self, coinbase_txid: &str, block_hash: &str) -> String {
        let tx = match self.data_source.raw_transaction(coinbase_txid, block_hash).await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::warn!(block_hash, error = %e, "Coinbase lookup failed, miner unknown.");
                return UNKNOWN_MINER.to_string();
            }
        };

        tx.vout
            .first()
            .and_then(|out| out.script_pub_key.payout_address())
            .unwrap_or_else(|| UNKNOWN_MINER.to_string())
    }
}
