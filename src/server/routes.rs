//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/auto-generate", post(handlers::auto_generate))
        .route("/api/auto-generate", post(handlers::auto_generate))
        .route("/api/quotas", get(handlers::api_quotas))
        .route("/translate", post(handlers::translate))
        .route("/api/translate", post(handlers::translate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
