// Configuration module
// Layers an optional config file over DYNHTTP_-prefixed environment
// variables, with built-in defaults for every setting.

use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Base directory static files are resolved beneath
    pub base_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Maximum buffered request body size in bytes
    pub max_body_size: u64,
    /// Seconds a dynamic handler may run before the request is error-finalized
    pub handler_timeout: u64,
    /// Seconds a single connection may stay open
    pub connection_timeout: u64,
    pub keep_alive: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SecurityConfig {
    /// Base64-encoded 32-byte cipher key
    pub key: String,
    /// Signing key for MACs
    pub mac_key: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Named connection pools: alias -> connection URL
    pub pools: HashMap<String, String>,
}

impl Config {
    /// Load configuration from `config.toml` (if present), the environment
    /// and the built-in defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DYNHTTP"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("content.base_dir", "public")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("http.handler_timeout", 30)?
            .set_default("http.connection_timeout", 60)?
            .set_default("http.keep_alive", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.content.base_dir, "public");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.database.pools.is_empty());
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.is_ipv4());
    }
}
