//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

/// Guess the Content-Type of a file from its extension (case-insensitive)
///
/// # Examples
/// ```
/// use devserve::http::mime::guess_content_type;
/// use std::path::Path;
/// assert_eq!(guess_content_type(Path::new("index.HTML")), "text/html; charset=utf-8");
/// assert_eq!(guess_content_type(Path::new("app.mjs")), "text/javascript");
/// assert_eq!(guess_content_type(Path::new("README")), "application/octet-stream");
/// ```
pub fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    content_type_for(extension.as_deref())
}

fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "text") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        Some("csv") => "text/csv",
        Some("xml") => "application/xml",

        // Scripts and data
        Some("js" | "mjs") => "text/javascript",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("bmp") => "image/bmp",

        // 3D assets
        Some("gltf") => "model/gltf+json",
        Some("glb") => "model/gltf-binary",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogv") => "video/ogg",
        Some("mov") => "video/quicktime",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg" | "oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Archives and documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",

        _ => "application/octet-stream",
    }
}
