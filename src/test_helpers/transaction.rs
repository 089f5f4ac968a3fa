//! Builder for `RawTransaction` test fixtures.

use crate::providers::rpc::{RawTransaction, ScriptPubKey, TxOut};

/// Builds `RawTransaction` values for the miner resolution paths.
///
/// By default the transaction has no outputs; use one of the output methods
/// to shape the first output's script.
#[derive(Debug, Clone, Default)]
pub struct RawTransactionBuilder {
    tx: RawTransaction,
}

impl RawTransactionBuilder {
    /// Creates a builder for a coinbase-like transaction without outputs.
    pub fn new() -> Self {
        Self { tx: RawTransaction { txid: "coinbase".to_string(), vout: Vec::new() } }
    }

    /// Sets the transaction id.
    pub fn txid(mut self, txid: impl Into<String>) -> Self {
        self.tx.txid = txid.into();
        self
    }

    /// Adds an output whose script decodes to a single `address` field.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.tx.vout.push(TxOut {
            script_pub_key: ScriptPubKey { address: Some(address.into()), addresses: None },
        });
        self
    }

    /// Adds an output whose script decodes to an `addresses` list.
    pub fn addresses(mut self, addresses: Vec<&str>) -> Self {
        self.tx.vout.push(TxOut {
            script_pub_key: ScriptPubKey {
                address: None,
                addresses: Some(addresses.into_iter().map(String::from).collect()),
            },
        });
        self
    }

    /// Adds an output whose script decodes to no address at all.
    pub fn bare_output(mut self) -> Self {
        self.tx.vout.push(TxOut::default());
        self
    }

    /// Builds the `RawTransaction`.
    pub fn build(self) -> RawTransaction {
        self.tx
    }
}
