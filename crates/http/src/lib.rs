//! HTTP proxy for placefind location search.
//!
//! Browsers cannot set the identifying `User-Agent` Nominatim's usage policy asks
//! for, so front-ends call `GET /api/locations` here and this server forwards the
//! lookup with the configured agent, returning normalized candidates.

pub mod api;
pub mod error;

use axum::{routing::get, Router};
use placefind_core::{Config, LocationProvider};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use api::{api_health, api_locations};

/// Shared state for the proxy routes.
pub struct ApiState<P: LocationProvider> {
    pub provider: P,
    pub limit: usize,
    pub min_query_len: usize,
}

impl<P: LocationProvider> ApiState<P> {
    pub fn new(provider: P, config: &Config) -> Self {
        Self { provider, limit: config.limit, min_query_len: config.min_query_len }
    }
}

pub fn router<P: LocationProvider>(state: Arc<ApiState<P>>) -> Router {
    Router::new()
        .route("/health", get(api_health))
        .route("/api/locations", get(api_locations::<P>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve<P: LocationProvider>(
    addr: SocketAddr,
    state: Arc<ApiState<P>>,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(provider = state.provider.name(), "Location proxy listening on http://{local}");
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
