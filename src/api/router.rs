use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Bearer token required when API_TOKEN is set
    let protected = Router::new()
        // Portfolio
        .route("/api/portfolio/:address", get(handlers::portfolio::snapshot))
        .route("/api/portfolio/:address/health", get(handlers::portfolio::health))
        .route("/api/portfolio/:address/opportunities", get(handlers::portfolio::opportunities))
        // Yield catalog
        .route("/api/pools", get(handlers::pools::list))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
