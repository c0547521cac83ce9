// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig,
};

/// Environment variable prefix, e.g. `DROP_STORAGE__ROOT_DIR`
const ENV_PREFIX: &str = "DROP";

impl Config {
    /// Load configuration from a file path (extension optional), then
    /// `DROP_*` environment variables, then built-in defaults.
    ///
    /// A missing file is not an error.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 300)?
            .set_default("performance.write_timeout", 300)?
            .set_default("http.server_name", "static-drop")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 104_857_600)? // 100MB
            .set_default("storage.root_dir", "static_files")?
            .set_default("storage.url_prefix", "/resources")?
            .set_default("storage.chunk_size", 65_536)?
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
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from("/nonexistent/static-drop-config").unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.storage.url_prefix, "/resources");
        assert_eq!(cfg.storage.chunk_size, 65_536);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.logging.access_log_file.is_none());
        assert!(cfg.http.enable_cors);
        assert!(cfg.performance.max_connections.is_none());
        assert_eq!(cfg.socket_addr().unwrap().to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drop.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[storage]\nroot_dir = \"/srv/assets\"\nurl_prefix = \"/r\""
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.storage.root_dir, std::path::PathBuf::from("/srv/assets"));
        assert_eq!(cfg.storage.url_prefix, "/r");
        // Untouched keys keep their defaults
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.http.max_body_size, 104_857_600);
    }

    #[test]
    fn test_invalid_address() {
        let mut cfg = Config::load_from("/nonexistent/static-drop-config").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}
