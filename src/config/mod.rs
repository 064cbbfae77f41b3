// Configuration module entry point
// Loads startup configuration from the environment and holds per-request state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, LoggingConfig, BIND_HOST, DEFAULT_PORT};

/// Environment variables as handed to the `config` crate
pub type EnvMap = config::Map<String, String>;

impl Config {
    /// Load configuration from the process environment and bind it to the
    /// current working directory.
    pub fn load() -> crate::Result<Self> {
        let mut cfg = Self::load_from_env(None)?;
        cfg.root = std::env::current_dir().map_err(crate::ServeError::Root)?;
        Ok(cfg)
    }

    /// Load configuration from an explicit variable map, or the process
    /// environment when `env` is `None`.
    ///
    /// `PORT` comes from the unprefixed source; logging settings use the
    /// `SERVE_` prefix with `__` for nesting (`SERVE_LOGGING__LEVEL=debug`).
    /// A `PORT` that is not a valid `u16` is an error, never replaced by the
    /// default.
    pub fn load_from_env(env: Option<EnvMap>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .add_source(config::Environment::default().source(env.clone()))
            .add_source(
                config::Environment::with_prefix("SERVE")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default_port() {
        let cfg = Config::load_from_env(Some(env(&[]))).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:80");
    }

    #[test]
    fn test_port_from_env() {
        let cfg = Config::load_from_env(Some(env(&[("PORT", "8081")]))).unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.host, BIND_HOST);
    }

    #[test]
    fn test_invalid_port_is_error() {
        assert!(Config::load_from_env(Some(env(&[("PORT", "abc")]))).is_err());
        assert!(Config::load_from_env(Some(env(&[("PORT", "70000")]))).is_err());
    }

    #[test]
    fn test_logging_defaults() {
        let cfg = Config::load_from_env(Some(env(&[]))).unwrap();
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
    }

    #[test]
    fn test_logging_from_prefixed_env() {
        let cfg = Config::load_from_env(Some(env(&[
            ("SERVE_LOGGING__ACCESS_LOG", "false"),
            ("SERVE_LOGGING__ACCESS_LOG_FORMAT", "json"),
            ("SERVE_LOGGING__LEVEL", "debug"),
        ])))
        .unwrap();
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.logging.level, "debug");
    }
}
