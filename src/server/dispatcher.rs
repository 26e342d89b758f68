//! Request dispatch
//!
//! Top-level control for every request: resolve the exact pathname against
//! the registry, then drive either the static or the dynamic path to a
//! single completed response. Per request the flow is
//! `routing -> (static | accumulating) -> handling -> finalized`, and
//! exactly one handler arm runs.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Body, Bytes};

use crate::http::build_plain_response;
use crate::logger::Logger;
use crate::server::accumulator::RequestAccumulator;
use crate::server::error::{self, AccumulateError, HandlerError, INTERNAL_ERROR_BODY};
use crate::server::exchange::Exchange;
use crate::server::registry::{RequestData, RouteHandler};
use crate::server::request::Request;
use crate::server::response::{Responder, Response};
use crate::server::state::AppState;
use crate::server::static_files;

static LOG: Logger = Logger::new("server:dispatcher");

pub const TRANSPORT_ERROR_BODY: &str = "Error occurred while processing HTTP request";
pub const BODY_TOO_LARGE_BODY: &str = "413 - Request Body Too Large";

/// Handle one request end to end.
///
/// Unregistered paths go wholesale to the static content server; registered
/// paths get their body accumulated and their handler invoked. Always
/// produces a complete, well-formed response.
pub async fn handle_request<B>(
    req: hyper::Request<B>,
    state: Arc<AppState>,
) -> Result<hyper::Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    let pathname = req.uri().path().to_string();
    LOG.info(&format!(
        "process request ({}) {pathname}",
        req.method().as_str()
    ));

    let response = match state.resolve(&pathname).await {
        Some(handler) => serve_dynamic(req, handler, &state).await,
        None => static_files::serve(&state.config.content.base_dir, &pathname).await,
    };
    Ok(response)
}

/// Accumulate the body, then invoke exactly one handler arm
async fn serve_dynamic<B>(
    req: hyper::Request<B>,
    handler: RouteHandler,
    state: &Arc<AppState>,
) -> hyper::Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    let (parts, body) = req.into_parts();
    LOG.info(&format!("serve dynamic for {}", parts.uri.path()));

    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    let buffered = match RequestAccumulator::new(limit).collect(body).await {
        Ok(bytes) => bytes,
        Err(AccumulateError::TooLarge { limit }) => {
            LOG.warn(&format!(
                "request body for {} over {limit} bytes rejected",
                parts.uri.path()
            ));
            return build_plain_response(413, BODY_TOO_LARGE_BODY);
        }
        Err(AccumulateError::Transport(e)) => {
            LOG.error(&format!("error occurred e: {e}"));
            return build_plain_response(500, TRANSPORT_ERROR_BODY);
        }
    };

    match handler {
        RouteHandler::Callback(callback) => {
            let data = RequestData {
                method: parts.method.as_str().to_lowercase(),
                pathname: parts.uri.path().to_string(),
                query: parts.uri.query().map(ToString::to_string),
                body: buffered,
            };
            let mut responder = Responder::new();
            callback(&data, &mut responder);
            responder.into_reply().unwrap_or_else(|| {
                LOG.error(&format!(
                    "callback handler for {} never responded",
                    data.pathname
                ));
                build_plain_response(500, INTERNAL_ERROR_BODY)
            })
        }
        RouteHandler::Exchange(handler) => {
            let request = Request::from_parts(&parts, buffered.clone());
            let exchange = Exchange::new(request, Response::new());

            let timeout = Duration::from_secs(state.config.http.handler_timeout);
            match tokio::time::timeout(timeout, handler(exchange)).await {
                Ok((mut exchange, Ok(()))) => finalize(&mut exchange),
                Ok((mut exchange, Err(err))) => {
                    exchange.err = Some(err);
                    error::handle(&mut exchange)
                }
                Err(_) => {
                    // The hung handler still owns its exchange; error-finalize a fresh one
                    LOG.warn(&format!(
                        "handler for {} exceeded {}s",
                        parts.uri.path(),
                        timeout.as_secs()
                    ));
                    let request = Request::from_parts(&parts, buffered);
                    let mut exchange = Exchange::new(request, Response::new());
                    exchange.err = Some(HandlerError::Timeout);
                    error::handle(&mut exchange)
                }
            }
        }
    }
}

fn finalize(exchange: &mut Exchange) -> hyper::Response<Full<Bytes>> {
    match exchange.res.finalize() {
        Ok(reply) => reply,
        Err(e) => {
            LOG.error(&format!(
                "could not finalize response for {}: {e}",
                exchange.req.path()
            ));
            build_plain_response(500, INTERNAL_ERROR_BODY)
        }
    }
}
