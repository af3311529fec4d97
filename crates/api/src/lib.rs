//! HTTP API server for the commerce backend.
//!
//! Parses cart payloads, maps engine failures to status codes, and
//! serializes orders and catalog entries. Authentication happens upstream;
//! this layer only reads the owner identity it is handed.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use query::OrderQueries;
use reservation::ReservationEngine;
use store::CommerceStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create))
        .route("/orders", get(routes::orders::list))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/products", get(routes::products::list))
        .route("/products/{id}", get(routes::products::get))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over a connected store.
pub fn create_state(store: CommerceStore) -> Arc<AppState> {
    Arc::new(AppState {
        engine: ReservationEngine::new(store.clone()),
        queries: OrderQueries::new(store.clone()),
        store,
    })
}
