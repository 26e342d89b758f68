//! Error taxonomy and the error-to-response policy
//!
//! Each component handles the failures it detects itself; only
//! handler-originated errors reach [`handle`], which turns an exchange
//! carrying an error into a finalized response.

use http_body_util::Full;
use hyper::body::Bytes;
use thiserror::Error;

use crate::logger::Logger;
use crate::server::exchange::Exchange;

static LOG: Logger = Logger::new("server:error");

pub const INTERNAL_ERROR_BODY: &str = "internal server error";
pub const GENERIC_ERROR_BODY: &str = "error occurred while processing message";

/// Failure raised by a dynamic handler
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Message(String),
    #[error("handler timed out")]
    Timeout,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Failure in the response wrapper itself
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    /// The response was already written; a second finalize is a programming error
    #[error("response already finalized")]
    DoubleFinalize,
    #[error("could not assemble response: {0}")]
    Build(String),
}

/// Failure while receiving a request body
#[derive(Debug, Error)]
pub enum AccumulateError {
    #[error("transport error while reading request body: {0}")]
    Transport(String),
    #[error("request body exceeds the configured limit of {limit} bytes")]
    TooLarge { limit: usize },
}

/// Finalize an exchange that carries an error.
///
/// Policy: a client-error status with a non-empty body passes through
/// unchanged (the handler produced a meaningful error body); a client-error
/// status with an empty body gets a fixed generic message; anything else is
/// forced to 500. The raw error text never reaches the client.
pub fn handle(exchange: &mut Exchange) -> hyper::Response<Full<Bytes>> {
    if let Some(err) = &exchange.err {
        LOG.error(&format!(
            "exchange error occurred for {}: {err}",
            exchange.req.path()
        ));
    }

    let response = &mut exchange.res;
    if response.status < 400 {
        response.status = 500;
        response.text(INTERNAL_ERROR_BODY);
    } else if response.body.is_empty() {
        // client-error status without a body gets the generic message
        response.text(GENERIC_ERROR_BODY);
    }

    match response.finalize() {
        Ok(reply) => reply,
        Err(e) => {
            LOG.error(&format!("could not finalize error response: {e}"));
            crate::http::build_plain_response(500, INTERNAL_ERROR_BODY)
        }
    }
}
