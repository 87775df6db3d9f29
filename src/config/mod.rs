// Configuration module entry point
// Layers defaults, an optional config file and the environment

mod state;
mod types;

use std::env;
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Default config file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Precedence, lowest first: built-in defaults, the config file,
    /// `REVIEWS_<SECTION>__<KEY>` variables, then `PORT` and `REVIEWS_CSV`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with(
            config_path,
            env::var("PORT").ok(),
            env::var("REVIEWS_CSV").ok(),
        )
    }

    /// Same layering as [`Config::load_from`], with the `PORT` and
    /// `REVIEWS_CSV` values passed in
    fn load_with(
        config_path: &str,
        port: Option<String>,
        reviews_csv: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("REVIEWS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("data.reviews_path", "data/reviews.csv")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.backlog", 128)?
            .set_default("http.server_name", "review-analyzer")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("routes.health_enabled", true)?
            .set_default("routes.health_path", "/healthz")?
            .set_override_option("server.port", port)?
            .set_override_option("data.reviews_path", reviews_csv)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
