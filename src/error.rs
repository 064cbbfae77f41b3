//! Startup error type
//!
//! Request-time failures never surface here: they become HTTP status codes.

use std::net::SocketAddr;
use thiserror::Error;

/// Fatal errors that stop the server before (or while) it starts listening
#[derive(Debug, Error)]
pub enum ServeError {
    /// Environment could not be turned into a valid `Config` (e.g. `PORT=abc`)
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("cannot resolve served directory: {0}")]
    Root(#[source] std::io::Error),

    #[error("failed to install logger: {0}")]
    Logger(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_message() {
        let err = ServeError::Bind {
            addr: "127.0.0.1:80".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        };
        assert_eq!(err.to_string(), "failed to bind 127.0.0.1:80: address in use");
    }
}
