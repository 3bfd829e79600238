//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let router = Router::new()
        // Inference
        .route("/ws", get(handlers::ws_handler))
        // Health and introspection
        .route("/health", get(handlers::health_check))
        .route("/model", get(handlers::model_info))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http());

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
