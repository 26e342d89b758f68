//! Response wrapper
//!
//! Mutable response-in-progress with an explicit finalize-once state, plus
//! the completion callback handed to callback-style handlers.

use http_body_util::Full;
use hyper::body::Bytes;

use crate::logger::Logger;
use crate::server::error::ResponseError;

static LOG: Logger = Logger::new("server:response");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteState {
    Open,
    Finalized,
}

/// Response-in-progress for one dynamic request
///
/// Defaults: status 200, `text/plain`, empty body. The chaining helpers
/// mutate state and return `self`; [`Response::finalize`] emits the wire
/// response exactly once.
#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: Bytes,
    cookies: Vec<String>,
    state: WriteState,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            content_type: "text/plain".to_string(),
            body: Bytes::new(),
            cookies: Vec::new(),
            state: WriteState::Open,
        }
    }

    pub fn ok(&mut self) -> &mut Self {
        self.status = 200;
        self
    }

    pub fn not_found(&mut self) -> &mut Self {
        self.status = 404;
        self
    }

    pub fn basic_client_error(&mut self) -> &mut Self {
        self.status = 400;
        self
    }

    /// Serialize `body` as the JSON response body
    ///
    /// A value that cannot be serialized degrades to a 500 with a fixed
    /// message; the serialization error is logged, not sent.
    pub fn json<T: serde::Serialize>(&mut self, body: &T) -> &mut Self {
        match serde_json::to_vec(body) {
            Ok(encoded) => {
                self.content_type = "application/json".to_string();
                self.body = Bytes::from(encoded);
            }
            Err(e) => {
                LOG.error(&format!("could not serialize response body: {e}"));
                self.status = 500;
                self.content_type = "text/plain".to_string();
                self.body = Bytes::from_static(b"internal server error");
            }
        }
        self
    }

    pub fn text(&mut self, body: impl Into<String>) -> &mut Self {
        self.content_type = "text/plain".to_string();
        self.body = Bytes::from(body.into());
        self
    }

    pub fn add_cookie(&mut self, cookie: impl Into<String>) -> &mut Self {
        self.cookies.push(cookie.into());
        self
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.state == WriteState::Finalized
    }

    /// Close the response flow and emit the wire response.
    ///
    /// May be called at most once; a second call is rejected loudly instead
    /// of producing a second write sequence. The dispatcher owns the single
    /// finalize call — handlers only mutate state.
    pub fn finalize(&mut self) -> Result<hyper::Response<Full<Bytes>>, ResponseError> {
        if self.state == WriteState::Finalized {
            LOG.warn("finalize called on an already finalized response");
            return Err(ResponseError::DoubleFinalize);
        }
        self.state = WriteState::Finalized;

        let mut builder = hyper::Response::builder()
            .status(self.status)
            .header("Content-Type", self.content_type.as_str());
        for cookie in &self.cookies {
            builder = builder.header("Set-Cookie", cookie.as_str());
        }
        builder
            .body(Full::new(self.body.clone()))
            .map_err(|e| ResponseError::Build(e.to_string()))
    }
}

/// Completion callback for callback-style handlers
///
/// `respond(status, body, cookies)` finalizes the reply at most once; later
/// calls are ignored with a warning so the client observes exactly one
/// response.
pub struct Responder {
    reply: Option<hyper::Response<Full<Bytes>>>,
}

impl Responder {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { reply: None }
    }

    pub fn respond(&mut self, status: u16, body: impl Into<Bytes>, cookies: &[String]) {
        if self.reply.is_some() {
            LOG.warn("respond called more than once; extra call ignored");
            return;
        }
        let mut builder = hyper::Response::builder()
            .status(status)
            .header("Content-Type", "text/plain");
        for cookie in cookies {
            builder = builder.header("Set-Cookie", cookie.as_str());
        }
        match builder.body(Full::new(body.into())) {
            Ok(reply) => self.reply = Some(reply),
            Err(e) => LOG.error(&format!("could not assemble callback reply: {e}")),
        }
    }

    #[must_use]
    pub fn has_replied(&self) -> bool {
        self.reply.is_some()
    }

    pub(crate) fn into_reply(self) -> Option<hyper::Response<Full<Bytes>>> {
        self.reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_200_text_plain_empty() {
        let response = Response::new();
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "text/plain");
        assert!(response.body.is_empty());
    }

    #[test]
    fn helpers_chain_on_the_same_instance() {
        let mut response = Response::new();
        response.not_found().text("gone");
        assert_eq!(response.status, 404);
        assert_eq!(response.body, Bytes::from("gone"));
    }

    #[test]
    fn json_sets_content_type_and_body() {
        let mut response = Response::new();
        response.ok().json(&serde_json::json!({"a": 1}));
        assert_eq!(response.content_type, "application/json");
        assert_eq!(response.body, Bytes::from("{\"a\":1}"));
    }

    #[test]
    fn finalize_emits_the_wire_response_once() {
        let mut response = Response::new();
        response.ok().text("Hello");
        let reply = response.finalize().unwrap();
        assert_eq!(reply.status(), 200);
        assert!(response.is_finalized());
    }

    #[test]
    fn second_finalize_is_rejected() {
        let mut response = Response::new();
        response.finalize().unwrap();
        assert_eq!(response.finalize().map(|_| ()), Err(ResponseError::DoubleFinalize));
    }

    #[test]
    fn cookies_become_set_cookie_headers() {
        let mut response = Response::new();
        response.add_cookie("session=abc").add_cookie("theme=dark");
        let reply = response.finalize().unwrap();
        let cookies: Vec<_> = reply.headers().get_all("Set-Cookie").iter().collect();
        assert_eq!(cookies.len(), 2);
    }

    #[test]
    fn responder_keeps_only_the_first_reply() {
        let mut responder = Responder::new();
        responder.respond(201, "first", &[]);
        responder.respond(500, "second", &[]);
        let reply = responder.into_reply().unwrap();
        assert_eq!(reply.status(), 201);
    }

    #[test]
    fn responder_without_reply_yields_none() {
        let responder = Responder::new();
        assert!(!responder.has_replied());
        assert!(responder.into_reply().is_none());
    }
}
