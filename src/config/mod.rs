// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{AssetsConfig, Config};

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources are layered: built-in defaults, then the optional file, then
    /// `UPLOADS__SECTION__KEY` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_layered(config_path, None)
    }

    /// `env` replaces the process environment when given
    fn load_layered(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("UPLOADS")
                    .prefix_separator("__")
                    .separator("__")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }

    fn builder(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("assets.url_prefix", "/uploads/**")?
            .set_default("assets.root", "uploads")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.server_name", "uploads-server")?
            .set_default("http.enable_cors", true)?
            .set_default("http.enable_health", true)?
            .set_default("http.health_path", "/healthz")
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
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("this-config-file-does-not-exist").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.assets.url_prefix, "/uploads/**");
        assert_eq!(cfg.assets.root, "uploads");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.http.health_path, "/healthz");
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("server.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[assets]\nurl_prefix = \"/media/**\"\nroot = \"/srv/media\"\n\n[server]\nport = 9090\n"
        )
        .unwrap();

        let base = path.with_extension("");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.assets.url_prefix, "/media/**");
        assert_eq!(cfg.assets.root, "/srv/media");
        assert_eq!(cfg.server.port, 9090);
        // Untouched keys keep their defaults
        assert_eq!(cfg.server.host, "127.0.0.1");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "[assets]\nroot = \"/from/file\"\n\n[server]\nport = 9090\n")
            .unwrap();

        let env = config::Map::from([
            ("UPLOADS__ASSETS__ROOT".to_string(), "/srv/media".to_string()),
            ("UPLOADS__SERVER__PORT".to_string(), "9191".to_string()),
            ("OTHER__SERVER__PORT".to_string(), "1".to_string()),
        ]);
        let base = path.with_extension("");
        let cfg = Config::load_layered(base.to_str().unwrap(), Some(env)).unwrap();
        assert_eq!(cfg.assets.root, "/srv/media");
        assert_eq!(cfg.server.port, 9191);
        assert_eq!(cfg.assets.url_prefix, "/uploads/**");
    }

    #[test]
    fn test_keep_alive_switch() {
        let mut cfg = Config::load_from("this-config-file-does-not-exist").unwrap();
        assert!(cfg.performance.keep_alive_enabled());

        cfg.performance.keep_alive_timeout = 0;
        assert!(!cfg.performance.keep_alive_enabled());
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("this-config-file-does-not-exist").unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
