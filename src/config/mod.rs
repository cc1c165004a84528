// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::{AppState, Stores};
pub use types::{
    Config, HttpConfig, LoggingConfig, NotifyConfig, PerformanceConfig, ServerConfig,
    StorageConfig,
};

impl Config {
    /// Load configuration from the default "config.toml" file
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Layering: defaults < config file < `SKY_STORE__*` environment
    /// variables (e.g. `SKY_STORE__NOTIFY__BOT_TOKEN`). The notifier
    /// credentials have no defaults and must come from the file or the
    /// environment.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SKY_STORE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("http.server_name", "SkyStore/0.1")?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.uploads_dir", "uploads")?
            .set_default("storage.static_dir", "static")?
            .set_default("notify.api_base", "https://api.telegram.org")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_rejected() {
        // No config file and no environment overrides: the notifier
        // credentials are absent and loading must fail rather than fall back
        // to a built-in token.
        let result = Config::load_from("does-not-exist");
        assert!(result.is_err());
    }
}
