//! Construction of the retryable HTTP clients used for all outbound calls.

mod client;

pub use client::{build_http_client, HttpClientError};
