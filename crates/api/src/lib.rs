//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for the home dashboard
//! - Application state shared across handlers

pub mod routes;

use std::sync::Arc;

use axum::Router;
use fiscus_core::home::HomeService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Home dashboard aggregation service.
    pub home: Arc<HomeService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
