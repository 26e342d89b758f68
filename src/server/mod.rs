//! HTTP server core
//!
//! Request dispatch between static and dynamic content, the request body
//! accumulator, the Exchange request/response wrapper lifecycle and the
//! error-to-response policy.

pub mod accumulator;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod exchange;
pub mod listener;
pub mod registry;
pub mod request;
pub mod response;
pub mod state;
pub mod static_files;

pub use dispatcher::handle_request;
pub use exchange::{Attachment, Exchange};
pub use listener::create_reusable_listener;
pub use registry::{PathRegistry, RequestData, RouteHandler};
pub use request::Request;
pub use response::{Responder, Response};
pub use state::AppState;
