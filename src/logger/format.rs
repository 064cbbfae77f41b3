//! Access log format module
//!
//! Supports multiple log formats:
//! - `common` (Common Log Format, the default)
//! - `combined` (common plus referer and user agent)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` substitution

use chrono::{DateTime, Local};
use std::time::Duration;

/// Timestamp layout shared by `common`, `combined` and `$time_local`
const CLF_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log layout selected by `logging.access_log_format`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessLogFormat {
    Common,
    Combined,
    Json,
    Custom(String),
}

impl AccessLogFormat {
    pub fn parse(name: &str) -> Self {
        match name {
            "common" => Self::Common,
            "combined" => Self::Combined,
            "json" => Self::Json,
            pattern => Self::Custom(pattern.to_string()),
        }
    }
}

/// One served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Path plus query string, as received
    pub target: String,
    /// Protocol version as printed in the request line, e.g. `HTTP/1.1`
    pub version: String,
    pub status: u16,
    /// Response body size; `None` when unknown or empty
    pub body_bytes: Option<u64>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub elapsed: Duration,
}

impl AccessLogEntry {
    /// Create an entry stamped with the current time
    pub fn new(remote_addr: String, method: String, target: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            target,
            version: "HTTP/1.1".to_string(),
            status: 200,
            body_bytes: None,
            referer: None,
            user_agent: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn format(&self, format: &AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Common => self.format_common(),
            AccessLogFormat::Combined => self.format_combined(),
            AccessLogFormat::Json => self.format_json(),
            AccessLogFormat::Custom(pattern) => self.format_custom(pattern),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.target, self.version)
    }

    fn bytes_field(&self) -> String {
        self.body_bytes
            .filter(|&n| n > 0)
            .map_or_else(|| "-".to_string(), |n| n.to_string())
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME_FORMAT),
            self.request_line(),
            self.status,
            self.bytes_field(),
        )
    }

    /// Common format followed by `"$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "target": self.target,
            "version": self.version,
            "status": self.status,
            "body_bytes": self.body_bytes.unwrap_or(0),
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX),
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`
    /// (seconds, 3 decimals), `$status`, `$body_bytes_sent`,
    /// `$http_referer`, `$http_user_agent`.
    fn format_custom(&self, pattern: &str) -> String {
        // Longer names first: `$request_time` and `$request_uri` share a prefix with `$request`
        let vars = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME_FORMAT).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{:.3}", self.elapsed.as_secs_f64())),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.target.clone()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.bytes_field()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".into())),
            ("$http_user_agent", self.user_agent.clone().unwrap_or_else(|| "-".into())),
        ];

        vars.iter()
            .fold(pattern.to_string(), |line, (name, value)| {
                line.replace(name, value)
            })
    }
}
