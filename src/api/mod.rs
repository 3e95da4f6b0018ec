//! API module
//!
//! HTTP API endpoints and middleware.

pub mod cors;
pub mod middleware;
pub mod routes;
pub mod views;

use axum::{middleware::from_fn, middleware::from_fn_with_state, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub use routes::create_router;

/// Build the full application router.
///
/// Layers run outermost first: CORS, request id, tracing, then for `/api`
/// routes logging and authentication.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = create_router()
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware))
        .layer(from_fn(middleware::logging_middleware));

    Router::new()
        // Health check (no auth)
        .route("/health", get(routes::health_check))
        .nest("/api", protected_routes)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(from_fn(cors::cors_middleware))
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}
