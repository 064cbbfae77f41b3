//! Logger module
//!
//! Thin helpers over `tracing` so call sites stay one line:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//!
//! Everything goes to stderr; stdout is reserved for the startup banner.

mod format;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::LoggingConfig;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins over `logging.level` when set. Should be called once at
/// application startup.
pub fn init(config: &LoggingConfig) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| crate::ServeError::Logger(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| crate::ServeError::Logger(e.to_string()))
}

/// The two operator-facing startup lines
pub fn log_server_start(addr: &SocketAddr) {
    println!("Serving at http://{addr}");
    println!("Press Ctrl+C to stop.");
}

pub fn log_server_stop(addr: &SocketAddr) {
    tracing::info!("Shutting down, releasing {addr}");
}

pub fn log_serving_root(root: &std::path::Path) {
    tracing::debug!("Serving files from {}", root.display());
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &hyper::Error) {
    // Clients hanging up early is routine
    if err.is_incomplete_message() || err.is_canceled() {
        tracing::debug!("[Connection] Closed early: {err}");
    } else {
        tracing::warn!("[Connection] Failed to serve connection: {err}");
    }
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
