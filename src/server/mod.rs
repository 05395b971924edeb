//! HTTP host
//!
//! Exposes the orchestrator over HTTP:
//!
//! - `GET /health` - service metadata for diagnostics
//! - `POST /exports/:record_id` - export one record and return its link

pub mod exports;
pub mod health;

use crate::core::export::ExportOrchestrator;
use crate::domain::errors::DocshipError;
use crate::domain::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ExportOrchestrator>,
}

/// Build the router
pub fn router(orchestrator: Arc<ExportOrchestrator>) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/exports/:record_id", post(exports::export_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { orchestrator })
}

/// Serve until `shutdown` turns true or its sender is dropped
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns [`DocshipError::Server`] if the listener fails
pub async fn serve(
    listener: TcpListener,
    orchestrator: Arc<ExportOrchestrator>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|e| DocshipError::Server(format!("Listener has no local address: {e}")))?;
    tracing::info!(%addr, "docship listening");

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(async move {
            // Err means the sender is gone, which also ends the server
            let _ = shutdown.wait_for(|stop| *stop).await;
            tracing::info!("Shutting down HTTP host");
        })
        .await
        .map_err(|e| DocshipError::Server(e.to_string()))
}
