//! Conditional request module
//!
//! `Last-Modified` formatting and `If-Modified-Since` evaluation.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate layout used by HTTP date headers
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a modification time as an HTTP-date, truncated to whole seconds
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP-date header value, returning `None` when it is not one
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Decide whether a conditional GET can be answered with 304.
///
/// `If-None-Match` takes precedence: when present the date is not consulted
/// (no entity tags are issued, so it never matches). Unparsable dates are
/// ignored. The file counts as unmodified when its mtime, truncated to
/// seconds, is not newer than the client's date.
pub fn not_modified_since(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    modified: SystemTime,
) -> bool {
    if if_none_match.is_some() {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}
