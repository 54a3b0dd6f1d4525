//! API Routes
//!
//! Configures the Axum router with all replay cache endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_handler, delete_handler, deploy_handler, health_handler, input_handler, list_handler,
    status_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /nodes` - List deployed nodes
/// - `PUT /nodes/:name` - Deploy a node
/// - `DELETE /nodes/:name` - Undeploy a node
/// - `POST /nodes/:name/input` - Deliver a message to a node
/// - `GET /nodes/:name/status` - Node status line and counters
/// - `GET /nodes/:name/cache` - Retained messages
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/nodes", get(list_handler))
        .route("/nodes/:name", put(deploy_handler).delete(delete_handler))
        .route("/nodes/:name/input", post(input_handler))
        .route("/nodes/:name/status", get(status_handler))
        .route("/nodes/:name/cache", get(cache_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
