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
    #[serde(default)]
    pub email: EmailConfig,
    pub upload: UploadConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub enable_cors: bool,
    /// Whole-body ceiling for the multipart endpoint; the 10 MB file cap
    /// is a separate fixed constant.
    pub max_body_size: u64,
}

/// Email delivery configuration. The key can come from the config file, the
/// `SERVER`-prefixed environment, or the conventional `SENDGRID_API_KEY`
/// variable. Absence disables real sending in favor of logging.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EmailConfig {
    #[serde(default)]
    pub sendgrid_api_key: Option<String>,
}

/// Upload spool configuration
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub dir: String,
}
