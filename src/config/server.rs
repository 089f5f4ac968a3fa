use serde::Deserialize;

/// Configuration for the REST API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address and port for the HTTP server to listen on.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Whether the HTTP server is started at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_listen_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen_address: default_listen_address(), enabled: default_enabled() }
    }
}
