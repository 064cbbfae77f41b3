//! HTTP protocol layer module
//!
//! Protocol helpers decoupled from file serving: response builders, the
//! CORS/no-cache decorator, conditional requests, ranges and MIME types.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use headers::with_cors_no_cache;
pub use range::evaluate_range;
pub use response::{
    build_304_response, build_400_response, build_404_response, build_416_response,
    build_501_response, build_redirect_response, html_escape,
};
