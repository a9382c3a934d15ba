pub mod page;
pub mod routes;
pub mod state;

pub use state::AppState;

use anyhow::Context;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Serves the page and API until Ctrl+C.
pub async fn serve(state: Arc<AppState>, bind: SocketAddr) -> anyhow::Result<()> {
    let shutdown = async {
        if signal::ctrl_c().await.is_err() {
            log::warn!("could not listen for Ctrl+C; stop the process to exit");
            std::future::pending::<()>().await;
        }
    };
    let (address, server) = warp::serve(routes::routes(state))
        .try_bind_with_graceful_shutdown(bind, shutdown)
        .with_context(|| format!("binding HTTP server to {bind}"))?;

    info!("serving saved locations on http://{}", address);
    server.await;
    info!("HTTP server stopped");
    Ok(())
}
