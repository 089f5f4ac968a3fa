//! Configuration module for blockpulse.

mod app_config;
mod helpers;
mod http_retry;
mod server;

pub use app_config::AppConfig;
pub use helpers::{deserialize_duration_from_ms, deserialize_duration_from_seconds};
pub use http_retry::{HttpRetryConfig, JitterSetting};
pub use server::ServerConfig;
