//! Request wrapper
//!
//! Immutable view over the raw incoming head plus the fully buffered body.
//! Constructed once per dynamic request and owned by its exchange; never
//! mutated afterwards.

use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::HeaderMap;

#[derive(Debug)]
pub struct Request {
    url: String,
    method: String,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Build the immutable request view from the raw head and buffered body.
    ///
    /// The absolute URL takes its scheme from the `x-forwarded-proto` hint,
    /// falling back to `http`; the host comes from the Host header.
    #[must_use]
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");
        let host = parts
            .headers
            .get("host")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");

        let path = parts.uri.path().to_string();
        let query = parts.uri.query().map(ToString::to_string);
        let url = match &query {
            Some(q) => format!("{scheme}://{host}{path}?{q}"),
            None => format!("{scheme}://{host}{path}"),
        };

        Self {
            url,
            method: parts.method.as_str().to_lowercase(),
            path,
            query,
            headers: parts.headers.clone(),
            body,
        }
    }

    /// Absolute request URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Lower-cased HTTP method
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query component, without the leading `?`
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value, when present and valid text
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Fully buffered request body
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_for(uri: &str, extra: &[(&str, &str)]) -> Parts {
        let mut builder = hyper::Request::builder()
            .method("POST")
            .uri(uri)
            .header("host", "example.com");
        for (name, value) in extra {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn builds_absolute_url_with_http_fallback() {
        let request = Request::from_parts(&parts_for("/echo", &[]), Bytes::new());
        assert_eq!(request.url(), "http://example.com/echo");
    }

    #[test]
    fn scheme_comes_from_the_protocol_hint() {
        let parts = parts_for("/echo", &[("x-forwarded-proto", "https")]);
        let request = Request::from_parts(&parts, Bytes::new());
        assert_eq!(request.url(), "https://example.com/echo");
    }

    #[test]
    fn method_is_lower_cased() {
        let request = Request::from_parts(&parts_for("/echo", &[]), Bytes::new());
        assert_eq!(request.method(), "post");
    }

    #[test]
    fn query_is_split_from_the_path() {
        let request = Request::from_parts(&parts_for("/search?q=rust&page=2", &[]), Bytes::new());
        assert_eq!(request.path(), "/search");
        assert_eq!(request.query(), Some("q=rust&page=2"));
        assert_eq!(request.url(), "http://example.com/search?q=rust&page=2");
    }

    #[test]
    fn body_bytes_are_preserved() {
        let request = Request::from_parts(&parts_for("/upload", &[]), Bytes::from_static(b"{\"a\":1}"));
        assert_eq!(request.body().as_ref(), b"{\"a\":1}");
    }
}
