//! HTTP client construction for tests.

use reqwest_middleware::ClientWithMiddleware;

use crate::config::HttpRetryConfig;
use crate::http_client::build_http_client;

/// Creates an HTTP client that never retries, so tests can assert on exact
/// request counts.
pub fn create_test_http_client() -> ClientWithMiddleware {
    build_http_client(&HttpRetryConfig::no_retries(), None).expect("test HTTP client")
}
