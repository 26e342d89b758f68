//! Content-type resolution
//!
//! Maps a request path's file extension to the Content-Type used in the
//! response header.

use std::path::Path;

/// Resolve the Content-Type for a file path based on its extension
///
/// Paths without an extension (or with an unmapped one) resolve to
/// `application/octet-stream`.
///
/// # Examples
/// ```
/// use dynhttp::http::mime::content_type_for;
/// assert_eq!(content_type_for("/public/index.html"), "text/html");
/// assert_eq!(content_type_for("/README"), "application/octet-stream");
/// ```
pub fn content_type_for(path: &str) -> &'static str {
    let extension = Path::new(path).extension().and_then(|e| e.to_str());
    match extension {
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
