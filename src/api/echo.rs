//! Echo route

use crate::server::RouteHandler;

/// Exchange handler answering 200 "Hello"
#[must_use]
pub fn handler() -> RouteHandler {
    RouteHandler::exchange(|mut exchange| async move {
        exchange.res.ok().text("Hello");
        (exchange, Ok(()))
    })
}
