//! Integration tests for the JSON-RPC chain data source against a mock node.

use blockpulse::providers::rpc::CoreRpcSource;
use blockpulse::providers::traits::{ChainDataSource, DataSourceError};
use blockpulse::test_helpers::create_test_http_client;
use mockito::Matcher;
use serde_json::json;
use url::Url;

fn source_for(server: &mockito::Server, user: Option<&str>, password: Option<&str>) -> CoreRpcSource {
    CoreRpcSource::new(
        create_test_http_client(),
        Url::parse(&server.url()).unwrap(),
        user.map(String::from),
        password.map(String::from),
    )
}

#[tokio::test]
async fn test_block_count_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "getblockcount" })))
        .with_status(200)
        .with_body(r#"{"result": 840000, "error": null, "id": "blockpulse"}"#)
        .expect(1)
        .create_async()
        .await;

    let source = source_for(&server, None, None);
    let count = source.block_count().await.unwrap();

    assert_eq!(count, 840_000);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rpc_error_envelope_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    // Core-style nodes report RPC failures with a 500 status and the error
    // inside the envelope.
    server
        .mock("POST", "/")
        .with_status(500)
        .with_body(r#"{"result": null, "error": {"code": -8, "message": "Block height out of range"}, "id": "blockpulse"}"#)
        .create_async()
        .await;

    let source = source_for(&server, None, None);
    let result = source.block_hash(999_999_999).await;

    match result {
        Err(DataSourceError::Rpc { code, message }) => {
            assert_eq!(code, -8);
            assert_eq!(message, "Block height out of range");
        }
        other => panic!("expected RPC error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_envelope_without_result_or_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"result": null, "error": null, "id": "blockpulse"}"#)
        .create_async()
        .await;

    let source = source_for(&server, None, None);
    let result = source.block_count().await;

    assert!(matches!(result, Err(DataSourceError::EmptyResult(method)) if method == "getblockcount"));
}

#[tokio::test]
async fn test_block_fetch_deserializes_node_response() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "result": {
            "hash": "00000abc",
            "height": 840_000,
            "time": 1_713_571_767,
            "nTx": 3050,
            "size": 1_500_000,
            "weight": 3_993_000,
            "tx": ["cb-txid", "other-txid"],
            "confirmations": 2
        },
        "error": null,
        "id": "blockpulse"
    });
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "getblock", "params": ["00000abc"] })))
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let source = source_for(&server, None, None);
    let block = source.block("00000abc").await.unwrap();

    assert_eq!(block.height, 840_000);
    assert_eq!(block.n_tx, 3050);
    assert_eq!(block.tx.first().map(String::as_str), Some("cb-txid"));
}

#[tokio::test]
async fn test_raw_transaction_requests_verbose_and_scoped() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "getrawtransaction",
            "params": ["cb-txid", true, "00000abc"]
        })))
        .with_status(200)
        .with_body(
            json!({
                "result": {
                    "txid": "cb-txid",
                    "vout": [{ "scriptPubKey": { "address": "bc1qpool" } }]
                },
                "error": null,
                "id": "blockpulse"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let source = source_for(&server, None, None);
    let tx = source.raw_transaction("cb-txid", "00000abc").await.unwrap();

    assert_eq!(tx.vout[0].script_pub_key.payout_address().as_deref(), Some("bc1qpool"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_basic_auth_header_is_sent_when_configured() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        // base64("user:pass")
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .with_body(r#"{"result": 1, "error": null, "id": "blockpulse"}"#)
        .expect(1)
        .create_async()
        .await;

    let source = source_for(&server, Some("user"), Some("pass"));
    source.block_count().await.unwrap();

    mock.assert_async().await;
}
