//! Local static file server that marks every response cross-origin readable
//! and uncacheable.
//!
//! The served directory is the working directory at startup, exposed
//! read-only on `127.0.0.1:$PORT`.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::Config;
pub use error::{Result, ServeError};
