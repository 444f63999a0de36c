// Configuration types module
// One struct per config.toml section

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub chain: ChainConfig,
    pub logging: LoggingConfig,
    pub connection: ConnectionConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// `[server]` - where to listen and how much to accept
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; one per core when unset
    pub workers: Option<usize>,
    /// Concurrent connection cap; unlimited when unset
    pub max_connections: Option<usize>,
}

/// `[chain]` - the externally produced chain file
#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub data_file: String,
}

/// `[logging]`
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// debug, info, warn or error
    pub level: String,
    pub access_log: bool,
    /// combined, common, json, or a `$variable` pattern
    pub access_log_format: String,
    /// stdout when unset
    pub access_log_file: Option<String>,
    /// stderr when unset
    pub error_log_file: Option<String>,
}

/// `[connection]` - per-connection HTTP/1 behaviour
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectionConfig {
    pub keep_alive: bool,
    /// Seconds
    pub read_timeout: u64,
    /// Seconds
    pub write_timeout: u64,
}

impl ConnectionConfig {
    /// Upper bound on the lifetime of one connection
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout.max(self.write_timeout))
    }
}

/// `[http]`
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Value of the `Server` response header
    pub server_name: String,
    pub enable_cors: bool,
    /// Requests declaring a larger `Content-Length` are refused with 413
    pub max_body_size: u64,
}

/// `[health]` - liveness/readiness probes that never touch the chain file
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HealthConfig {
    pub enabled: bool,
    pub liveness_path: String,
    pub readiness_path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            liveness_path: "/healthz".to_string(),
            readiness_path: "/readyz".to_string(),
        }
    }
}

impl HealthConfig {
    pub fn matches(&self, path: &str) -> bool {
        self.enabled && (path == self.liveness_path || path == self.readiness_path)
    }
}
