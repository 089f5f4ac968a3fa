use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use url::Url;

use super::{
    deserialize_duration_from_ms, deserialize_duration_from_seconds, HttpRetryConfig, ServerConfig,
};

fn default_rpc_url() -> Url {
    Url::parse("http://127.0.0.1:8332").expect("static default RPC URL")
}

fn default_price_api_url() -> Url {
    Url::parse("https://mempool.space/api/v1").expect("static default price API URL")
}

/// Provides the default value for price_timeout_secs.
fn default_price_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Provides the default value for concurrency.
fn default_concurrency() -> usize {
    8
}

/// Provides the default value for default_page_limit.
fn default_page_limit() -> u64 {
    10
}

/// Provides the default value for polling_interval_ms.
fn default_polling_interval() -> Duration {
    Duration::from_millis(10_000)
}

/// Provides the default value for feed_dedup_capacity.
fn default_feed_dedup_capacity() -> usize {
    1024
}

/// Provides the default value for shutdown_timeout.
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Application configuration for blockpulse.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// URL of the chain node's JSON-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: Url,

    /// RPC username for basic auth, if the node requires one.
    #[serde(default)]
    pub rpc_user: Option<String>,

    /// RPC password for basic auth, if the node requires one.
    #[serde(default)]
    pub rpc_password: Option<String>,

    /// Base URL of the historical price API. Which endpoint is appropriate
    /// depends on the chain's unit (e.g. mempool.space for BTC,
    /// litecoinspace.org for LTC).
    #[serde(default = "default_price_api_url")]
    pub price_api_url: Url,

    /// Hard per-call timeout for historical price lookups.
    #[serde(
        rename = "price_timeout_secs",
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_price_timeout"
    )]
    pub price_timeout: Duration,

    /// The number of concurrent in-flight block fetches per page request.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Page size applied when a request does not specify a limit.
    #[serde(default = "default_page_limit")]
    pub default_page_limit: u64,

    /// The interval in milliseconds to poll for a new chain tip.
    #[serde(
        rename = "polling_interval_ms",
        deserialize_with = "deserialize_duration_from_ms",
        default = "default_polling_interval"
    )]
    pub polling_interval: Duration,

    /// How many recently delivered block hashes the live feed remembers for
    /// duplicate suppression.
    #[serde(default = "default_feed_dedup_capacity")]
    pub feed_dedup_capacity: usize,

    /// The maximum time in seconds to wait for graceful shutdown.
    #[serde(
        rename = "shutdown_timeout_secs",
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_shutdown_timeout"
    )]
    pub shutdown_timeout: Duration,

    /// Retry policy for outbound HTTP clients.
    #[serde(default)]
    pub http_retry: HttpRetryConfig,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            rpc_user: None,
            rpc_password: None,
            price_api_url: default_price_api_url(),
            price_timeout: default_price_timeout(),
            concurrency: default_concurrency(),
            default_page_limit: default_page_limit(),
            polling_interval: default_polling_interval(),
            feed_dedup_capacity: default_feed_dedup_capacity(),
            shutdown_timeout: default_shutdown_timeout(),
            http_retry: HttpRetryConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory,
    /// with `BLOCKPULSE__`-prefixed environment variables taking precedence.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{config_dir_str}/app.yaml")))
            .add_source(Environment::with_prefix("BLOCKPULSE").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn test_defaults_cover_every_field() {
        let config = Config::builder()
            .add_source(config::File::from_str("", FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>()
            .unwrap();

        assert_eq!(config.rpc_url.as_str(), "http://127.0.0.1:8332/");
        assert_eq!(config.price_timeout, Duration::from_secs(5));
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.default_page_limit, 10);
        assert_eq!(config.polling_interval, Duration::from_millis(10_000));
        assert_eq!(config.feed_dedup_capacity, 1024);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let yaml = r#"
          rpc_url: "http://node.internal:18443"
          rpc_user: "watcher"
          rpc_password: "hunter2"
          price_timeout_secs: 2
          concurrency: 4
          polling_interval_ms: 500
        "#;
        let config = Config::builder()
            .add_source(config::File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>()
            .unwrap();

        assert_eq!(config.rpc_url.as_str(), "http://node.internal:18443/");
        assert_eq!(config.rpc_user.as_deref(), Some("watcher"));
        assert_eq!(config.price_timeout, Duration::from_secs(2));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.polling_interval, Duration::from_millis(500));
    }
}
