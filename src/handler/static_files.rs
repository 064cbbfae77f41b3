//! Static file serving module
//!
//! Resolves translated paths under the served root and answers with a file,
//! an index file, a directory listing, a redirect or an error.

use super::listing;
use super::path::{percent_decode, translate_path};
use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeOutcome, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

const NOT_FOUND: &str = "File not found";
const NO_LISTING: &str = "No permission to list directory";

/// A path that exists and is contained in the served root
struct Resolved {
    /// Path as joined from the request, used for MIME guessing
    path: PathBuf,
    metadata: Metadata,
}

/// Serve the request path from the served root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let translated = translate_path(ctx.path);
    let target = state.root().join(&translated.relative);

    let Some(resolved) = resolve(state.root(), &target, ctx.path).await else {
        return http::build_404_response(NOT_FOUND);
    };

    if resolved.metadata.is_dir() {
        return serve_directory(ctx, state, &resolved.path).await;
    }

    // A file addressed like a directory
    if translated.trailing_slash {
        return http::build_404_response(NOT_FOUND);
    }

    serve_file(ctx, &resolved).await
}

/// Stat `target` and make sure it canonicalizes to somewhere under `root`
async fn resolve(root: &Path, target: &Path, request_path: &str) -> Option<Resolved> {
    // Missing files are the common 404, not worth a log line
    let metadata = fs::metadata(target).await.ok()?;
    let canonical = fs::canonicalize(target).await.ok()?;

    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        return None;
    }

    Some(Resolved {
        path: target.to_path_buf(),
        metadata,
    })
}

async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        let location = match ctx.query {
            Some(query) => format!("{}/?{query}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    for index in &state.index_files {
        let candidate = dir.join(index);
        if let Some(resolved) = resolve(state.root(), &candidate, ctx.path).await {
            if resolved.metadata.is_file() {
                return serve_file(ctx, &resolved).await;
            }
        }
    }

    match listing::read_entries(dir).await {
        Ok(entries) => {
            let html = listing::render_listing(&percent_decode(ctx.path), &entries);
            response::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!("Cannot list directory '{}': {e}", dir.display()));
            http::build_404_response(NO_LISTING)
        }
    }
}

async fn serve_file(ctx: &RequestContext<'_>, file: &Resolved) -> Response<Full<Bytes>> {
    let last_modified = cache::format_http_date(
        file.metadata
            .modified()
            .unwrap_or_else(|_| SystemTime::now()),
    );

    if let Ok(modified) = file.metadata.modified() {
        if cache::not_modified_since(
            ctx.if_none_match.as_deref(),
            ctx.if_modified_since.as_deref(),
            modified,
        ) {
            return http::build_304_response(&last_modified);
        }
    }

    let content = match fs::read(&file.path).await {
        Ok(c) => Bytes::from(c),
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to read file '{}': {}",
                file.path.display(),
                e
            ));
            return http::build_404_response(NOT_FOUND);
        }
    };

    let content_type = mime::guess_content_type(&file.path);
    let total_size = content.len() as u64;

    match http::evaluate_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Partial(range) => {
            #[allow(clippy::cast_possible_truncation)]
            let slice = content.slice(range.start as usize..=range.end as usize);
            response::build_partial_response(
                slice,
                content_type,
                &last_modified,
                range,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Full => {
            response::build_file_response(content, content_type, &last_modified, ctx.is_head)
        }
    }
}
