//! Cross-origin and no-cache response headers
//!
//! Every response leaving the handler passes through [`with_cors_no_cache`].

use hyper::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, EXPIRES, PRAGMA,
};
use hyper::Response;

/// Headers merged on top of every response, in emission order
#[allow(clippy::declare_interior_mutable_const)]
pub const CORS_NO_CACHE_HEADERS: [(HeaderName, &str); 4] = [
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (PRAGMA, "no-cache"),
    (EXPIRES, "0"),
];

/// Merge the fixed header set into a response.
///
/// Uses `insert`, so a value set by the inner handler (e.g. a default
/// `Cache-Control`) is replaced and each header ends up present exactly once.
/// Nothing else in the header map is touched.
pub fn with_cors_no_cache<B>(mut response: Response<B>) -> Response<B> {
    let headers = response.headers_mut();
    for (name, value) in CORS_NO_CACHE_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}
