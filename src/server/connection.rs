// Connection handling module
// Serves one accepted TCP connection on a local task

use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::logger::Logger;
use crate::server::dispatcher;
use crate::server::state::AppState;

static LOG: Logger = Logger::new("server:connection");

/// Serve a connection in a spawned local task.
///
/// Wraps the stream for hyper's HTTP/1 driver, applies the configured
/// keep-alive setting and holds the whole connection under the connection
/// timeout. A failed or timed-out connection is logged and dropped; it never
/// takes the process down.
pub fn handle_connection(stream: tokio::net::TcpStream, state: Arc<AppState>) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let timeout = Duration::from_secs(state.config.http.connection_timeout);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.http.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { dispatcher::handle_request(req, state).await }
            }),
        );

        match tokio::time::timeout(timeout, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => LOG.error(&format!("failed to serve connection: {err}")),
            Err(_) => LOG.warn(&format!(
                "connection timed out after {} seconds",
                timeout.as_secs()
            )),
        }
    });
}
