//! HTTP Server
//!
//! This module implements the Prometheus exporter HTTP server.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing `/metrics` and `/`
//! - **Scrape on demand**: every `/metrics` request gathers the registry, which runs
//!   one scrape of the Hello API on a blocking thread
//! - **State Management**: the registry is shared behind an `Arc`
//!
//! # Endpoints
//!
//! - `GET /` - Redirects (302) to `/metrics`
//! - `GET /metrics` - Prometheus metrics in text format
//!
//! # Error Handling
//!
//! Hello API failures never fail the request; they show up as `hello_up 0` and
//! in `hello_errors_total`. Only rendering failures return a 500.

use crate::metrics;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use prometheus::Registry;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    registry: Arc<Registry>,
}

/// Builds the exporter router
pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(AppState { registry })
}

/// Serves the registry on `addr` until the server fails
pub async fn start(addr: &str, registry: Arc<Registry>) -> anyhow::Result<()> {
    let app = router(registry);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/metrics")])
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let registry = state.registry.clone();
    let rendered = tokio::task::spawn_blocking(move || metrics::render(&registry)).await;

    match rendered {
        Ok(Ok(metrics)) => metrics.into_response(),
        Ok(Err(e)) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
        Err(e) => {
            error!("Scrape task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Scrape task failed: {}", e),
            )
                .into_response()
        }
    }
}
