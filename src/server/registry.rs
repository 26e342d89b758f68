//! Path registry
//!
//! Exact-match table from URL path to a registered handler descriptor. The
//! handler variant is fixed at registration time; dispatch never infers it
//! from the handler value. Registration happens at startup, reads happen on
//! every request.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use hyper::body::Bytes;

use crate::server::error::HandlerError;
use crate::server::exchange::Exchange;
use crate::server::response::Responder;

/// Buffered request data handed to callback-style handlers
#[derive(Debug, Clone)]
pub struct RequestData {
    /// Lower-cased HTTP method
    pub method: String,
    pub pathname: String,
    /// Raw query component, without the leading `?`
    pub query: Option<String>,
    /// Fully buffered request body
    pub body: Bytes,
}

pub type CallbackFn = dyn Fn(&RequestData, &mut Responder) + Send + Sync;

/// Completion of an exchange handler: the exchange comes back together with
/// the outcome, so the response state it carries survives a failure.
pub type ExchangeOutcome = (Exchange, Result<(), HandlerError>);

pub type ExchangeFuture = BoxFuture<'static, ExchangeOutcome>;

pub type ExchangeFn = dyn Fn(Exchange) -> ExchangeFuture + Send + Sync;

/// Handler descriptor, tagged with its invocation contract
#[derive(Clone)]
pub enum RouteHandler {
    /// Invoked with buffered request data and an explicit completion callback
    Callback(Arc<CallbackFn>),
    /// Invoked with a fully wrapped exchange, completing asynchronously
    Exchange(Arc<ExchangeFn>),
}

impl RouteHandler {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&RequestData, &mut Responder) + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    /// Wrap an async function that takes ownership of the exchange and
    /// hands it back with the outcome
    pub fn exchange<F, Fut>(f: F) -> Self
    where
        F: Fn(Exchange) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ExchangeOutcome> + Send + 'static,
    {
        let wrapped: Arc<ExchangeFn> = Arc::new(move |exchange| {
            let fut: ExchangeFuture = Box::pin(f(exchange));
            fut
        });
        Self::Exchange(wrapped)
    }
}

impl fmt::Debug for RouteHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("RouteHandler::Callback"),
            Self::Exchange(_) => f.write_str("RouteHandler::Exchange"),
        }
    }
}

/// Exact-match table from URL path to handler
///
/// Single writer at startup, many concurrent readers afterwards. No prefix
/// or pattern matching and no trailing-slash normalization: callers register
/// the exact canonical path.
#[derive(Debug, Default)]
pub struct PathRegistry {
    routes: HashMap<String, RouteHandler>,
}

impl PathRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one handler for `path`; a later registration for the same path wins
    pub fn register(&mut self, path: impl Into<String>, handler: RouteHandler) {
        self.routes.insert(path.into(), handler);
    }

    /// Replace the entire registry wholesale
    pub fn set_allowed_paths(&mut self, paths: HashMap<String, RouteHandler>) {
        self.routes = paths;
    }

    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&RouteHandler> {
        self.routes.get(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_callback() -> RouteHandler {
        RouteHandler::callback(|_, _| {})
    }

    #[test]
    fn resolve_is_exact_match_only() {
        let mut registry = PathRegistry::new();
        registry.register("/echo", noop_callback());
        assert!(registry.resolve("/echo").is_some());
        assert!(registry.resolve("/echo/").is_none());
        assert!(registry.resolve("/ech").is_none());
        assert!(registry.resolve("/echo/extra").is_none());
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = PathRegistry::new();
        registry.register("/job", noop_callback());
        registry.register(
            "/job",
            RouteHandler::exchange(|exchange| async move { (exchange, Ok(())) }),
        );
        assert_eq!(registry.len(), 1);
        assert!(matches!(
            registry.resolve("/job"),
            Some(RouteHandler::Exchange(_))
        ));
    }

    #[test]
    fn set_allowed_paths_replaces_wholesale() {
        let mut registry = PathRegistry::new();
        registry.register("/old", noop_callback());

        let mut paths = HashMap::new();
        paths.insert("/new".to_string(), noop_callback());
        registry.set_allowed_paths(paths);

        assert!(registry.resolve("/old").is_none());
        assert!(registry.resolve("/new").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn variant_is_fixed_at_registration() {
        let mut registry = PathRegistry::new();
        registry.register("/cb", noop_callback());
        assert!(matches!(
            registry.resolve("/cb"),
            Some(RouteHandler::Callback(_))
        ));
    }
}
