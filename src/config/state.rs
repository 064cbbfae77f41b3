// Application state module
// Immutable per-process state shared by every connection

use std::path::{Path, PathBuf};

use super::types::{Config, LoggingConfig};
use crate::logger::AccessLogFormat;

/// Files tried, in order, when a directory is requested
const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Application state
#[derive(Debug)]
pub struct AppState {
    /// Canonical served root; containment checks compare against this
    pub root: PathBuf,
    pub index_files: Vec<String>,
    pub logging: LoggingConfig,
    /// `logging.access_log_format`, parsed once at startup
    pub access_log_format: AccessLogFormat,
}

impl AppState {
    /// Build state from startup configuration, canonicalizing the root
    pub fn new(config: &Config) -> std::io::Result<Self> {
        Ok(Self::with_root(config.root.canonicalize()?, config.logging.clone()))
    }

    pub fn with_root(root: PathBuf, logging: LoggingConfig) -> Self {
        Self {
            root,
            index_files: INDEX_FILES.iter().map(ToString::to_string).collect(),
            access_log_format: AccessLogFormat::parse(&logging.access_log_format),
            logging,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
