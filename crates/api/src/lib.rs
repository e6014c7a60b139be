//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Authentication middleware and the `AuthUser` extractor
//! - Mapping from application errors to JSON responses

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tally_db::Database;
use tally_shared::JwtService;
use tally_shared::config::{AdminConfig, SharingConfig};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store handle.
    pub db: Database,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Administrator bootstrap settings.
    pub admin: Arc<AdminConfig>,
    /// Share token settings.
    pub sharing: SharingConfig,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
