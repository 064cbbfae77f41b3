//! HTTP response building module
//!
//! Builders for every status the file server produces. None of them set
//! caching or CORS headers; those are merged afterwards by
//! [`crate::http::headers::with_cors_no_cache`].

use super::range::ByteRange;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, LAST_MODIFIED,
    LOCATION,
};
use hyper::{Response, StatusCode};

const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Build 200 response carrying a whole file
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    last_modified: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(LAST_MODIFIED, last_modified)
        .header(ACCEPT_RANGES, "bytes")
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("200", &e))
}

/// Build 206 Partial Content response; `data` is already the requested slice
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    last_modified: &str,
    range: ByteRange,
    total_size: u64,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, range.length())
        .header(CONTENT_RANGE, range.content_range(total_size))
        .header(LAST_MODIFIED, last_modified)
        .header(ACCEPT_RANGES, "bytes")
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("206", &e))
}

/// Build 200 HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, TEXT_HTML)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("HTML", &e))
}

/// Build 301 redirect, used to add the trailing slash to directory URLs
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("301", &e))
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(LAST_MODIFIED, last_modified)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("304", &e))
}

/// Build 400 Bad Request response for request heads that do not parse
pub fn build_400_response(reason: &str) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::BAD_REQUEST, reason)
}

/// Build 404 Not Found response with a short explanation
pub fn build_404_response(message: &str) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, message)
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(total_size: u64) -> Response<Full<Bytes>> {
    let mut resp = build_error_response(
        StatusCode::RANGE_NOT_SATISFIABLE,
        "Requested Range Not Satisfiable",
    );
    if let Ok(value) = HeaderValue::from_str(&format!("bytes */{total_size}")) {
        resp.headers_mut().insert(CONTENT_RANGE, value);
    }
    resp
}

/// Build 501 response for any method other than GET and HEAD
pub fn build_501_response(method: &str) -> Response<Full<Bytes>> {
    build_error_response(
        StatusCode::NOT_IMPLEMENTED,
        &format!("Unsupported method ('{method}')"),
    )
}

/// Small HTML error page: status code, message and the reason phrase
fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let code = status.as_u16();
    let explain = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Error response</title>\n\
         </head>\n\
         <body>\n\
         <h1>Error response</h1>\n\
         <p>Error code: {code}</p>\n\
         <p>Message: {}.</p>\n\
         <p>Error code explanation: {code} - {explain}.</p>\n\
         </body>\n\
         </html>\n",
        html_escape(message)
    );

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_HTML)
        .header(CONTENT_LENGTH, body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| fallback(status.as_str(), &e))
}

/// Escape text for inclusion in HTML element content
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Log a builder failure and fall back to an empty 500
fn fallback(status: &str, error: &hyper::http::Error) -> Response<Full<Bytes>> {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    resp
}
