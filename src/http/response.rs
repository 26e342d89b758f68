//! Shared wire-response builders
//!
//! Fixed responses used by the dispatch paths. Building a response never
//! fails the connection: a malformed builder falls back to a bare response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::logger::Logger;

static LOG: Logger = Logger::new("http:response");

/// Plain-text response with a fixed body
pub fn build_plain_response(status: u16, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            LOG.error(&format!("failed to build {status} response: {e}"));
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Static file response with the resolved content type
pub fn build_file_response(content: Vec<u8>, content_type: &'static str) -> Response<Full<Bytes>> {
    let length = content.len();
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", length)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            LOG.error(&format!("failed to build file response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_response_carries_status_and_type() {
        let response = build_plain_response(404, "404 - File Not Found");
        assert_eq!(response.status(), 404);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/plain"
        );
    }

    #[test]
    fn file_response_sets_length() {
        let response = build_file_response(b"body { }".to_vec(), "text/css");
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("Content-Type").unwrap(), "text/css");
        assert_eq!(response.headers().get("Content-Length").unwrap(), "8");
    }
}
