// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub notify: NotifyConfig,
}

/// Server endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; defaults to CPU cores when unset
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log file path; stdout when unset
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path; stderr when unset
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance tuning configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

/// HTTP behavior configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub enable_cors: bool,
    pub max_body_size: u64,
    pub server_name: String,
}

/// Storage paths for the whole-document JSON collections and assets
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding products.json, orders.json and slider.json
    pub data_dir: String,
    /// Directory holding uploaded product and slider images
    pub uploads_dir: String,
    /// Directory holding the storefront page and other assets
    pub static_dir: String,
}

/// Outbound chat-bot notification configuration
///
/// `bot_token` and `chat_id` are required and have no defaults; startup fails
/// without them.
#[derive(Debug, Deserialize, Clone)]
pub struct NotifyConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Messaging API base URL; overridable for tests
    pub api_base: String,
}
