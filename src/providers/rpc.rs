//! Bitcoin-Core-style JSON-RPC implementation of [`ChainDataSource`], plus the
//! wire types the node returns.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use super::traits::{ChainDataSource, DataSourceError};

/// Block data as returned by `getblock` at verbosity 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block hash.
    pub hash: String,
    /// Block height.
    pub height: u64,
    /// Chain-reported Unix timestamp.
    pub time: u64,
    /// Number of transactions in the block.
    #[serde(rename = "nTx")]
    pub n_tx: u64,
    /// Serialized block size in bytes.
    pub size: u64,
    /// Block weight in weight units.
    pub weight: u64,
    /// Transaction ids; the first entry is the coinbase transaction.
    #[serde(default)]
    pub tx: Vec<String>,
}

/// Per-block statistics as returned by `getblockstats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockStats {
    /// Minimum fee rate in the block.
    #[serde(rename = "minfeerate")]
    pub min_fee_rate: u64,
    /// Maximum fee rate in the block.
    #[serde(rename = "maxfeerate")]
    pub max_fee_rate: u64,
    /// Average fee rate in the block.
    #[serde(rename = "avgfeerate")]
    pub avg_fee_rate: u64,
    /// Fee rate percentiles: 10th, 25th, 50th, 75th, 90th.
    #[serde(rename = "feerate_percentiles", default)]
    pub fee_rate_percentiles: [u64; 5],
    /// Block subsidy in the smallest chain unit.
    pub subsidy: u64,
    /// Total fees in the block in the smallest chain unit.
    #[serde(rename = "totalfee")]
    pub total_fee: u64,
    /// Total output amount in the block in the smallest chain unit.
    #[serde(rename = "total_out")]
    pub total_output: u64,
}

/// A verbosely decoded transaction, trimmed to the fields the miner
/// resolution path inspects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Transaction id.
    pub txid: String,
    /// Transaction outputs.
    #[serde(default)]
    pub vout: Vec<TxOut>,
}

/// A single transaction output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxOut {
    /// The output's spending script.
    #[serde(rename = "scriptPubKey", default)]
    pub script_pub_key: ScriptPubKey,
}

/// A spending script with its decoded address, if the node decoded one.
///
/// Different node versions report the address under a single `address` field
/// or an `addresses` list; both shapes are supported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptPubKey {
    /// Decoded address (newer response shape).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Decoded addresses (older response shape).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,
}

impl ScriptPubKey {
    /// Returns the decoded address from whichever response shape is present.
    pub fn payout_address(&self) -> Option<String> {
        self.address
            .clone()
            .or_else(|| self.addresses.as_ref().and_then(|list| list.first().cloned()))
    }
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// A [`ChainDataSource`] backed by a Bitcoin-Core-compatible JSON-RPC node.
pub struct CoreRpcSource {
    client: ClientWithMiddleware,
    url: Url,
    auth: Option<(String, String)>,
}

impl CoreRpcSource {
    /// Creates a new `CoreRpcSource` speaking to the node at `url`.
    pub fn new(
        client: ClientWithMiddleware,
        url: Url,
        user: Option<String>,
        password: Option<String>,
    ) -> Self {
        let auth = user.map(|user| (user, password.unwrap_or_default()));
        Self { client, url, auth }
    }

    /// Issues one JSON-RPC call and unwraps its envelope.
    ///
    /// The node reports RPC-level failures inside the envelope (often along
    /// with a non-2xx status), so the body is parsed before the status is
    /// considered.
    #[tracing::instrument(skip(self, params), level = "debug")]
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, DataSourceError> {
        let body = serde_json::json!({
            "jsonrpc": "1.0",
            "id": "blockpulse",
            "method": method,
            "params": params,
        });

        let mut request = self.client.post(self.url.clone()).json(&body);
        if let Some((user, password)) = &self.auth {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await?;
        let envelope: RpcEnvelope<T> = response.json().await?;

        if let Some(error) = envelope.error {
            return Err(DataSourceError::Rpc { code: error.code, message: error.message });
        }
        envelope.result.ok_or_else(|| DataSourceError::EmptyResult(method.to_string()))
    }
}

#[async_trait]
impl ChainDataSource for CoreRpcSource {
    async fn block_count(&self) -> Result<u64, DataSourceError> {
        self.call("getblockcount", serde_json::json!([])).await
    }

    async fn block_hash(&self, height: u64) -> Result<String, DataSourceError> {
        self.call("getblockhash", serde_json::json!([height])).await
    }

    async fn block(&self, hash: &str) -> Result<BlockInfo, DataSourceError> {
        self.call("getblock", serde_json::json!([hash])).await
    }

    async fn block_stats(&self, hash: &str) -> Result<BlockStats, DataSourceError> {
        self.call("getblockstats", serde_json::json!([hash])).await
    }

    async fn raw_transaction(
        &self,
        txid: &str,
        block_hash: &str,
    ) -> Result<RawTransaction, DataSourceError> {
        self.call("getrawtransaction", serde_json::json!([txid, true, block_hash])).await
    }
}
