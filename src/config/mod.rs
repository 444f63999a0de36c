// Configuration module entry point
// Loads layered configuration (file, environment, defaults) and holds runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::chain::DEFAULT_CHAIN_FILE;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig};

/// Default config file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `CHAINDATA_SERVER__PORT=9000`
const ENV_PREFIX: &str = "CHAINDATA";

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn with_defaults(builder: Builder) -> Result<Builder, config::ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8000)?
        .set_default("chain.data_file", DEFAULT_CHAIN_FILE)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("connection.keep_alive", true)?
        .set_default("connection.read_timeout", 30)?
        .set_default("connection.write_timeout", 30)?
        .set_default("http.server_name", concat!("chaindata-api/", env!("CARGO_PKG_VERSION")))?
        .set_default("http.enable_cors", false)?
        .set_default("http.max_body_size", 1_048_576) // 1MB
}

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// Missing files are not an error; defaults and environment still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve the config path from command line arguments
    ///
    /// Accepts `--config <path>`, `--config=<path>` or a bare path.
    pub fn path_from_args<I>(args: I) -> String
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--config" || arg == "-c" {
                if let Some(path) = args.next() {
                    return path;
                }
            } else if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            } else if !arg.starts_with('-') {
                return arg;
            }
        }
        DEFAULT_CONFIG_PATH.to_string()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Defaults with the chain file pointed at `data_file`, ignoring the environment
    #[cfg(test)]
    pub fn for_chain_file(data_file: &std::path::Path) -> Self {
        let settings = with_defaults(config::Config::builder())
            .and_then(|b| b.set_override("chain.data_file", data_file.to_string_lossy().into_owned()))
            .and_then(|b| b.build())
            .unwrap();
        settings.try_deserialize().unwrap()
    }
}
