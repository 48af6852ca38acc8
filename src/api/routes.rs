use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_request_span, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/recommendations", get(handlers::recommendations))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
