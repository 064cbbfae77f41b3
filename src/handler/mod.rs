//! Request handler module
//!
//! [`handle_request`] is the service entry point: static file dispatch,
//! decorated with the CORS/no-cache header set, plus access logging.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

use crate::config::AppState;
use crate::http::with_cors_no_cache;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Never fails: every error is a status code, and every response, whatever
/// its status, leaves with the CORS/no-cache headers.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let response = with_cors_no_cache(router::dispatch(&req, &state).await);

    if state.logging.access_log {
        let mut entry = access_entry(&req, peer_addr);
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact();
        entry.elapsed = started.elapsed();
        logger::log_access(&entry, &state.access_log_format);
    }

    Ok(response)
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        target,
    );
    entry.version = format!("{:?}", req.version());
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}
