//! Upload route
//!
//! Callback-style handler: receives the buffered request data and
//! acknowledges with the completion callback.

use crate::logger::Logger;
use crate::server::RouteHandler;

static LOG: Logger = Logger::new("api:upload");

/// Callback handler acknowledging the received body
#[must_use]
pub fn handler() -> RouteHandler {
    RouteHandler::callback(|data, respond| {
        LOG.info(&format!(
            "received {} bytes for {}",
            data.body.len(),
            data.pathname
        ));
        respond.respond(200, "ok", &[]);
    })
}
