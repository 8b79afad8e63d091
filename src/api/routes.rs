use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::require_bearer;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes -- credentials travel in the body or are being revoked
    let public_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/verify", post(handlers::verify));

    // Protected routes -- gated by the edge bearer filter
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer,
        ));

    let internal_routes = Router::new().route("/_internal/health", get(handlers::health));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(internal_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
