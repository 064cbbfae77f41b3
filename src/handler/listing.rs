//! Directory listing module
//!
//! Renders an HTML index for directories that have no index file.

use super::path::percent_encode;
use crate::http::html_escape;
use std::path::Path;
use tokio::fs;

/// One row of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Text shown to the user (`dir/`, `link@`)
    pub display: String,
    /// Unencoded link target (`dir/` for directories)
    pub href: String,
}

/// Read a directory and build its rows, sorted case-insensitively by name.
///
/// Directories (including symlinks to directories) get a trailing `/` on
/// both display name and link; symlinks are displayed with a trailing `@`.
pub async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let is_link = entry
            .file_type()
            .await
            .map(|t| t.is_symlink())
            .unwrap_or(false);
        // Follows symlinks, like the listing links will
        let is_dir = fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        names.push((entry.file_name().to_string_lossy().into_owned(), is_dir, is_link));
    }

    names.sort_by_cached_key(|(name, _, _)| name.to_lowercase());

    Ok(names
        .into_iter()
        .map(|(name, is_dir, is_link)| {
            let suffix = if is_dir { "/" } else { "" };
            let display = if is_link {
                format!("{name}@")
            } else {
                format!("{name}{suffix}")
            };
            ListingEntry {
                display,
                href: format!("{name}{suffix}"),
            }
        })
        .collect())
}

/// Render the listing page for `display_path` (the decoded request path)
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", html_escape(display_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            percent_encode(&entry.href),
            html_escape(&entry.display)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
