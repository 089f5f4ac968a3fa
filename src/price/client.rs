//! HTTP client for mempool.space-compatible historical price endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use url::Url;

use super::{PriceLookup, PriceLookupError};

/// Response shape of `GET {base}/historical-price`.
#[derive(Debug, Deserialize)]
struct HistoricalPriceResponse {
    #[serde(default)]
    prices: Vec<PricePoint>,
}

/// One price sample. Currencies other than USD are ignored.
#[derive(Debug, Deserialize)]
struct PricePoint {
    #[serde(rename = "USD")]
    usd: Option<f64>,
}

/// A [`PriceLookup`] backed by a mempool.space-compatible HTTP API.
///
/// Every call is bounded by a hard timeout enforced on this side of the
/// connection; the deadline covers the whole request, including retries.
pub struct HistoricalPriceClient {
    client: ClientWithMiddleware,
    base_url: Url,
    timeout: Duration,
}

impl HistoricalPriceClient {
    /// Creates a new `HistoricalPriceClient` against `base_url`.
    pub fn new(client: ClientWithMiddleware, base_url: Url, timeout: Duration) -> Self {
        Self { client, base_url, timeout }
    }

    /// Builds the endpoint URL for one timestamp.
    fn endpoint(&self, timestamp: u64) -> Result<Url, PriceLookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PriceLookupError::Malformed("price API URL cannot be a base".to_string())
            })?
            .pop_if_empty()
            .push("historical-price");
        url.query_pairs_mut()
            .append_pair("currency", "USD")
            .append_pair("timestamp", &timestamp.to_string());
        Ok(url)
    }

    async fn fetch(&self, timestamp: u64) -> Result<f64, PriceLookupError> {
        let url = self.endpoint(timestamp)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(PriceLookupError::Status(response.status()));
        }

        let payload: HistoricalPriceResponse = response.json().await?;
        payload
            .prices
            .first()
            .and_then(|point| point.usd)
            .ok_or_else(|| PriceLookupError::Malformed("no USD price point".to_string()))
    }
}

#[async_trait]
impl PriceLookup for HistoricalPriceClient {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn price_at(&self, timestamp: u64) -> Result<f64, PriceLookupError> {
        match tokio::time::timeout(self.timeout, self.fetch(timestamp)).await {
            Ok(result) => result,
            Err(_) => Err(PriceLookupError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_http_client;

    fn client_for(base: &str) -> HistoricalPriceClient {
        HistoricalPriceClient::new(
            create_test_http_client(),
            Url::parse(base).unwrap(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_endpoint_preserves_base_path() {
        let client = client_for("https://mempool.space/api/v1");
        let url = client.endpoint(1_700_000_000).unwrap();
        assert_eq!(
            url.as_str(),
            "https://mempool.space/api/v1/historical-price?currency=USD&timestamp=1700000000"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = client_for("https://litecoinspace.org/api/v1/");
        let url = client.endpoint(42).unwrap();
        assert_eq!(
            url.as_str(),
            "https://litecoinspace.org/api/v1/historical-price?currency=USD&timestamp=42"
        );
    }
}
