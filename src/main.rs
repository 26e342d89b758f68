use std::sync::Arc;

use tokio::net::TcpListener;

use dynhttp::config::Config;
use dynhttp::db::DataSources;
use dynhttp::logger::{self, Logger};
use dynhttp::server::{connection, create_reusable_listener, AppState};

static LOG: Logger = Logger::new("main");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging.level);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = create_reusable_listener(addr)?;

    let mut sources = DataSources::new();
    for (alias, url) in &cfg.database.pools {
        sources.register(alias, url).await?;
    }
    let sources = Arc::new(sources);

    let state = Arc::new(AppState::new(cfg));
    state.set_allowed_paths(dynhttp::api::routes()).await;

    LOG.info(&format!("server is listening on port {}", addr.port()));

    // Connections are served on local tasks; the accept loop owns the thread
    let local = tokio::task::LocalSet::new();
    local.run_until(serve(listener, state, sources)).await
}

/// Accept connections until a shutdown is requested, then drain the pools
async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    sources: Arc<DataSources>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        if state.config.logging.access_log {
                            LOG.info(&format!("accepted connection from {peer_addr}"));
                        }
                        connection::handle_connection(stream, Arc::clone(&state));
                    }
                    Err(e) => LOG.error(&format!("failed to accept connection: {e}")),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                LOG.info("shutdown requested");
                sources.shutdown().await;
                return Ok(());
            }
        }
    }
}
