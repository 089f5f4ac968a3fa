//! Builds HTTP clients with retry middleware for transient errors, such as
//! network issues or rate limiting by the upstream node or price API.

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};
use thiserror::Error;

use crate::config::{HttpRetryConfig, JitterSetting};

/// Errors that can occur while constructing an HTTP client.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Builds an HTTP client that retries transient failures with exponential
/// backoff.
///
/// All calls this service makes are idempotent reads, so retrying is always
/// safe. `overall_timeout` caps every request issued through the returned
/// client; pass `None` for callers that enforce their own deadline.
pub fn build_http_client(
    config: &HttpRetryConfig,
    overall_timeout: Option<Duration>,
) -> Result<ClientWithMiddleware, HttpClientError> {
    let mut base = reqwest::Client::builder();
    if let Some(timeout) = overall_timeout {
        base = base.timeout(timeout);
    }
    let base_client = base.build()?;

    let policy_builder = match config.jitter {
        JitterSetting::None => ExponentialBackoff::builder().jitter(Jitter::None),
        JitterSetting::Full => ExponentialBackoff::builder().jitter(Jitter::Full),
    };
    let retry_policy = policy_builder
        .base(config.base_for_backoff)
        .retry_bounds(config.initial_backoff_ms, config.max_backoff_secs)
        .build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
