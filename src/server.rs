//! HTTP Listener
//!
//! Routes `/health` and `/v1/metrics` and serves them on a fixed port.

use anyhow::Result;
use axum::{routing::any, Router};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Config, LISTEN_PORT};
use crate::health::health_check;
use crate::relay::{relay_metrics, METRICS_PATH};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: Client,
}

impl AppState {
    /// Upstream client keeps reqwest defaults: no timeout, standard redirects.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            http_client: Client::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", any(health_check))
        .route(METRICS_PATH, any(relay_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `0.0.0.0:8080` and serve until the process is stopped.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT));
    info!("Starting server on port {}...", LISTEN_PORT);
    info!("Using API address: {}", state.config.api_address);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
