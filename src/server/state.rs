//! Shared server state
//!
//! The configuration and the path registry shared by every connection. The
//! registry has a single-writer/many-reader lifecycle: the bootstrap
//! installs handlers before the accept loop starts, requests only read.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::server::registry::{PathRegistry, RouteHandler};

pub struct AppState {
    pub config: Config,
    pub registry: RwLock<PathRegistry>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: RwLock::new(PathRegistry::new()),
        }
    }

    /// Replace the registered paths wholesale
    pub async fn set_allowed_paths(&self, paths: HashMap<String, RouteHandler>) {
        self.registry.write().await.set_allowed_paths(paths);
    }

    /// Register a single handler, overwriting any prior one for the path
    pub async fn register(&self, path: impl Into<String>, handler: RouteHandler) {
        self.registry.write().await.register(path, handler);
    }

    /// Look up the handler for an exact path, cloning the descriptor
    pub async fn resolve(&self, path: &str) -> Option<RouteHandler> {
        self.registry.read().await.resolve(path).cloned()
    }
}
