// Configuration module entry point
// Layered configuration: optional config file, SERVER-prefixed environment,
// built-in defaults.

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, EmailConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, UploadConfig,
};

impl Config {
    /// Load configuration, reading "config.toml" when present.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 12_582_912)? // headroom over the 10MB file cap
            .set_default("upload.dir", "/tmp")?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        // Conventional variable used by the original pipeline
        if cfg.email.sendgrid_api_key.is_none() {
            cfg.email.sendgrid_api_key = std::env::var("SENDGRID_API_KEY")
                .ok()
                .filter(|key| !key.is_empty());
        }

        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
