//! Request dispatch module
//!
//! Method validation and extraction of the request fields the file server
//! needs, followed by dispatch to static file serving.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH, RANGE};
use hyper::{HeaderMap, Method, Request, Response};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let headers = req.headers();
        Self {
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header_string(headers, &IF_NONE_MATCH),
            if_modified_since: header_string(headers, &IF_MODIFIED_SINCE),
            range_header: header_string(headers, &RANGE),
        }
    }
}

fn header_string(headers: &HeaderMap, name: &hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Produce the undecorated response for a request
pub async fn dispatch<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    if let Some(resp) = check_http_method(req.method()) {
        return resp;
    }

    let ctx = RequestContext::from_request(req);
    static_files::serve(&ctx, state).await
}

/// Only GET and HEAD are served; everything else is 501
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            Some(http::build_501_response(method.as_str()))
        }
    }
}
