//! HTTP server module: a thin wrapper over the aggregator and the live feed.
//!
//! Route handlers only parse parameters and translate results; all
//! sequencing and failure semantics live in the core components.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::aggregator::{BlockRangeAggregator, TimeRange};
use crate::config::ServerConfig;
use crate::feed::BlockFeed;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// The block range aggregator behind `/api/v1/blocks`.
    pub aggregator: Arc<BlockRangeAggregator>,
    /// The live feed behind the WebSocket endpoint.
    pub feed: Arc<BlockFeed>,
    /// Page size applied when the request does not specify one.
    pub default_page_limit: u64,
}

/// Query parameters of `GET /api/v1/blocks`.
#[derive(Debug, Deserialize)]
struct BlocksQuery {
    #[serde(rename = "timeRange")]
    time_range: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Serves one page of enriched blocks for the requested time window.
async fn blocks(State(state): State<AppState>, Query(query): Query<BlocksQuery>) -> Response {
    let time_range = TimeRange::parse(query.time_range.as_deref().unwrap_or("24h"));
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(state.default_page_limit).max(1);
    let now = Utc::now().timestamp().max(0) as u64;

    match state.aggregator.fetch_page(page, limit, time_range.cutoff(now)).await {
        Ok(blocks) => Json(blocks).into_response(),
        Err(e) => {
            tracing::error!(error = %e, ?time_range, page, limit, "Failed to fetch blocks.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch blocks" })),
            )
                .into_response()
        }
    }
}

/// Upgrades to a WebSocket that streams every new block the feed delivers.
async fn blocks_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| forward_feed(socket, state.feed))
}

/// Forwards feed deliveries to one WebSocket client until either side goes
/// away. The wire format is the same JSON shape the blocks endpoint serves.
async fn forward_feed(mut socket: WebSocket, feed: Arc<BlockFeed>) {
    let mut deliveries = feed.subscribe().await;
    while let Some(block) = deliveries.recv().await {
        let payload = match serde_json::to_string(&block) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize block for WebSocket.");
                continue;
            }
        };
        if socket.send(Message::Text(payload.into())).await.is_err() {
            tracing::debug!("WebSocket client disconnected.");
            break;
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/blocks", get(blocks))
        .route("/api/v1/blocks/ws", get(blocks_ws))
        .with_state(state)
}

/// Runs the HTTP server until the task is dropped.
pub async fn run_server(config: &ServerConfig, state: AppState) {
    let addr: SocketAddr =
        config.listen_address.parse().expect("Invalid server.listen_address format");

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
    tracing::info!(%addr, "HTTP server listening.");

    axum::serve(listener, app.into_make_service()).await.expect("Server failed");
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::price::MockPriceLookup;
    use crate::providers::traits::{DataSourceError, MockChainDataSource};
    use crate::test_helpers::{BlockInfoBuilder, BlockStatsBuilder, RawTransactionBuilder};

    /// State over a mocked chain whose blocks were all mined "now", so every
    /// window admits them.
    fn healthy_state(tip: u64) -> AppState {
        let now = Utc::now().timestamp() as u64;

        let mut chain = MockChainDataSource::new();
        chain.expect_block_count().returning(move || Ok(tip));
        chain.expect_block_hash().returning(|height| Ok(format!("h{height}")));
        chain.expect_block().returning(move |hash| {
            let height: u64 = hash.trim_start_matches('h').parse().unwrap();
            Ok(BlockInfoBuilder::new()
                .height(height)
                .hash(hash)
                .time(now)
                .coinbase(format!("cb{height}"))
                .build())
        });
        chain.expect_block_stats().returning(|_| Ok(BlockStatsBuilder::new().build()));
        chain
            .expect_raw_transaction()
            .returning(|_, _| Ok(RawTransactionBuilder::new().address("pool.example").build()));

        let mut price = MockPriceLookup::new();
        price.expect_price_at().returning(|_| Ok(65_000.0));

        AppState {
            aggregator: Arc::new(BlockRangeAggregator::new(
                Arc::new(chain),
                Arc::new(price),
                4,
            )),
            feed: Arc::new(BlockFeed::new(16)),
            default_page_limit: 10,
        }
    }

    fn failing_state() -> AppState {
        let mut chain = MockChainDataSource::new();
        chain.expect_block_count().returning(|| {
            Err(DataSourceError::Rpc { code: -28, message: "Loading block index".into() })
        });

        AppState {
            aggregator: Arc::new(BlockRangeAggregator::new(
                Arc::new(chain),
                Arc::new(MockPriceLookup::new()),
                4,
            )),
            feed: Arc::new(BlockFeed::new(16)),
            default_page_limit: 10,
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response =
            app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router(healthy_state(1000));
        let (status, body) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_blocks_defaults_to_first_page_of_ten() {
        let app = router(healthy_state(1000));
        let (status, body) = get_json(app, "/api/v1/blocks").await;

        assert_eq!(status, StatusCode::OK);
        let blocks = body.as_array().unwrap();
        assert_eq!(blocks.len(), 10);
        assert_eq!(blocks.first().unwrap()["height"], 991);
        assert_eq!(blocks.last().unwrap()["height"], 1000);
        assert_eq!(blocks.first().unwrap()["miner"], "pool.example");
        assert_eq!(blocks.first().unwrap()["priceUsd"], 65_000.0);
    }

    #[tokio::test]
    async fn test_blocks_honors_page_and_limit() {
        let app = router(healthy_state(1000));
        let (status, body) = get_json(app, "/api/v1/blocks?page=2&limit=5").await;

        assert_eq!(status, StatusCode::OK);
        let heights: Vec<u64> =
            body.as_array().unwrap().iter().map(|b| b["height"].as_u64().unwrap()).collect();
        assert_eq!(heights, vec![991, 992, 993, 994, 995]);
    }

    #[tokio::test]
    async fn test_blocks_clamps_zero_page_and_limit() {
        let app = router(healthy_state(1000));
        let (status, body) = get_json(app, "/api/v1/blocks?page=0&limit=0").await;

        assert_eq!(status, StatusCode::OK);
        let blocks = body.as_array().unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0]["height"], 1000);
    }

    #[tokio::test]
    async fn test_unreachable_tip_maps_to_generic_500() {
        let app = router(failing_state());
        let (status, body) = get_json(app, "/api/v1/blocks").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch blocks");
    }
}
