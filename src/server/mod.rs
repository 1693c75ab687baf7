//! Read-only HTTP service over the deployment record.
//!
//! # Responsibilities
//! - `GET /` landing page
//! - `GET /api/contract-info` current record, 404 until a deploy succeeded
//!
//! The server holds no deployment state of its own. Every request re-reads
//! the record file, so the deploy binary and this server compose in any
//! order and never need to coordinate.

pub mod handlers;

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::schema::ServerConfig;
use crate::store::RecordStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
}

/// The info server, ready to serve on a listener.
pub struct InfoServer {
    router: Router,
}

impl InfoServer {
    /// Build the router with its middleware layers.
    pub fn new(config: &ServerConfig, store: RecordStore) -> Self {
        let state = AppState { store };
        let router = Router::new()
            .route("/", get(handlers::index))
            .route("/api/contract-info", get(handlers::contract_info))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.request_timeout_secs),
            ))
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Serve until the shutdown signal fires, then drain gracefully.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Info server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Info server stopped");
        Ok(())
    }
}
