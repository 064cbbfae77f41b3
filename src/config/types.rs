// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Address the server always binds to
pub const BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 80;

/// Main configuration structure, built once at startup
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Fixed loopback address, never read from the environment
    #[serde(skip, default = "default_host")]
    pub host: IpAddr,
    pub port: u16,
    /// Served directory; filled from the working directory after loading
    #[serde(skip)]
    pub root: PathBuf,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is not set
    pub level: String,
    pub access_log: bool,
    /// Access log format (common, combined, json, or custom pattern)
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_host() -> IpAddr {
    BIND_HOST
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: "common".to_string(),
        }
    }
}
