//! Static content serving
//!
//! Resolves a request path beneath the base directory and emits the file
//! bytes with the content type derived from the extension. The resolved
//! path is canonicalized and checked against the base directory, so
//! traversal inputs can never read out-of-tree content. Every failure is a
//! terminal 404 for that request.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

use crate::http::{self, mime};
use crate::logger::Logger;

static LOG: Logger = Logger::new("server:static");

pub const NOT_FOUND_BODY: &str = "404 - File Not Found";

/// Serve the file at `pathname` beneath `base_dir`
pub async fn serve(base_dir: &str, pathname: &str) -> Response<Full<Bytes>> {
    LOG.info(&format!("serve static for {pathname}"));
    match load(base_dir, pathname).await {
        Some((content, content_type)) => http::build_file_response(content, content_type),
        None => http::build_plain_response(404, NOT_FOUND_BODY),
    }
}

async fn load(base_dir: &str, pathname: &str) -> Option<(Vec<u8>, &'static str)> {
    let relative = pathname.trim_start_matches('/');
    let file_path = Path::new(base_dir).join(relative);

    let base_canonical = match Path::new(base_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            LOG.warn(&format!("base directory '{base_dir}' not accessible: {e}"));
            return None;
        }
    };

    // Missing files fail canonicalization here; that is the common 404
    let file_canonical = file_path.canonicalize().ok()?;
    if !file_canonical.starts_with(&base_canonical) {
        LOG.warn(&format!("path traversal attempt blocked: {pathname}"));
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            LOG.error(&format!("failed to read '{}': {e}", file_canonical.display()));
            return None;
        }
    };

    Some((content, mime::content_type_for(pathname)))
}
