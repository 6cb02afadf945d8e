// SPDX-License-Identifier: MIT OR Apache-2.0

use std::net::SocketAddr;
use std::sync::Arc;

use imgfs_db::Engine;
use tokio::net::TcpListener;

use crate::routes::{router, AppState};

/// Runs the HTTP frontend until `SIGINT`/`SIGTERM`.
///
/// The accept loop is `axum::serve`'s own loop over a bound `TcpListener`;
/// each accepted connection is handled by a `tokio` task spawned by the
/// runtime, a detached worker per connection. Every engine entry point
/// still serializes through the gate inside `Engine` regardless of how
/// many connections are in flight concurrently. Dropping the listener and
/// the `Engine` on shutdown releases every resource the frontend owns.
pub async fn serve(engine: Arc<Engine>, addr: SocketAddr, index_html: String) -> anyhow::Result<()> {
    let state = AppState {
        engine,
        index_html: Arc::from(index_html),
    };
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "imgfs http frontend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("imgfs http frontend shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
