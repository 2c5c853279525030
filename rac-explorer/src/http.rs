//! Metrics HTTP endpoint
//!
//! - `GET /metrics` : Prometheus text exposition of the shared registry
//! - `GET /health`  : liveness plus the names of running explorers
//!
//! Served until the cancellation token fires.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use prometheus::Registry;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::ExplorerError;
use crate::metrics;

#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub explorers: Vec<&'static str>,
}

#[derive(Debug, serde::Serialize)]
struct HealthView {
    status: &'static str,
    explorers: Vec<&'static str>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match metrics::render(&state.registry) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthView> {
    Json(HealthView {
        status: "ok",
        explorers: state.explorers,
    })
}

/// Binds `addr` and serves until `cancel` fires
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    cancel: CancellationToken,
) -> Result<(), ExplorerError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Metrics endpoint listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Metrics endpoint stopped");
    Ok(())
}
