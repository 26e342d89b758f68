//! HTTP protocol layer
//!
//! Protocol-level helpers shared by the static and dynamic dispatch paths,
//! decoupled from any business logic.

pub mod mime;
pub mod response;

pub use mime::content_type_for;
pub use response::{build_file_response, build_plain_response};
