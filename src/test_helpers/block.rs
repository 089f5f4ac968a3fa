//! Builder for `BlockInfo` test fixtures.

use crate::providers::rpc::BlockInfo;

/// Builds `BlockInfo` values with sensible defaults for tests.
#[derive(Debug, Clone, Default)]
pub struct BlockInfoBuilder {
    block: BlockInfo,
}

impl BlockInfoBuilder {
    /// Creates a builder for a small, plausible block.
    pub fn new() -> Self {
        Self {
            block: BlockInfo {
                hash: "0000000000000000000f1a".to_string(),
                height: 1,
                time: 1_700_000_000,
                n_tx: 1,
                size: 1_000,
                weight: 4_000,
                tx: Vec::new(),
            },
        }
    }

    /// Sets the block height.
    pub fn height(mut self, height: u64) -> Self {
        self.block.height = height;
        self
    }

    /// Sets the block hash.
    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.block.hash = hash.into();
        self
    }

    /// Sets the chain-reported timestamp.
    pub fn time(mut self, time: u64) -> Self {
        self.block.time = time;
        self
    }

    /// Sets the transaction count.
    pub fn tx_count(mut self, n_tx: u64) -> Self {
        self.block.n_tx = n_tx;
        self
    }

    /// Sets the serialized size in bytes.
    pub fn size(mut self, size: u64) -> Self {
        self.block.size = size;
        self
    }

    /// Sets the block weight.
    pub fn weight(mut self, weight: u64) -> Self {
        self.block.weight = weight;
        self
    }

    /// Prepends a coinbase transaction id to the transaction list.
    pub fn coinbase(mut self, txid: impl Into<String>) -> Self {
        self.block.tx.insert(0, txid.into());
        self
    }

    /// Builds the `BlockInfo`.
    pub fn build(self) -> BlockInfo {
        self.block
    }
}
