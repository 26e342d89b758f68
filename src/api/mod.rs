//! Bundled request handlers
//!
//! The routes the default bootstrap installs into the path registry.

pub mod echo;
pub mod upload;

use std::collections::HashMap;

use crate::server::RouteHandler;

/// Paths installed by the default bootstrap
#[must_use]
pub fn routes() -> HashMap<String, RouteHandler> {
    let mut paths = HashMap::new();
    paths.insert("/echo".to_string(), echo::handler());
    paths.insert("/upload".to_string(), upload::handler());
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routes_are_registered_with_fixed_variants() {
        let routes = routes();
        assert!(matches!(
            routes.get("/echo"),
            Some(RouteHandler::Exchange(_))
        ));
        assert!(matches!(
            routes.get("/upload"),
            Some(RouteHandler::Callback(_))
        ));
    }
}
