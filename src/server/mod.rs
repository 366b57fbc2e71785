//! HTTP surface of the service
//!
//! This module exposes the leaderboard over axum:
//! - `GET /leaderboard` (and `/api/leaderboard`): JSON array of entries
//! - `GET /health`: liveness probe
//! - 429 with `Retry-After` when a client exceeds its window

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{client_key, router, CACHE_STATUS_HEADER, FORWARDED_FOR, LOOPBACK_CLIENT};

use crate::service::LeaderboardService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Serves the leaderboard until Ctrl+C or SIGTERM
///
/// Also starts the background sweep of expired rate limit records.
pub async fn serve(service: Arc<LeaderboardService>, addr: SocketAddr) -> crate::Result<()> {
    let sweeper = service.limiter().start_sweep_task();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let result = axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.abort();
    result?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server");
}
