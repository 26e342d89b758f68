//! dynhttp — minimal HTTP listener serving two kinds of content from one
//! socket: static files resolved beneath a base directory, and dynamically
//! registered handlers keyed by exact URL path.
//!
//! The dispatch core lives in [`server`]; [`db`] and [`security`] are the
//! narrow data-access and cipher collaborators, and [`config`] / [`logger`]
//! carry process configuration and console logging.

pub mod api;
pub mod config;
pub mod db;
pub mod http;
pub mod logger;
pub mod security;
pub mod server;
