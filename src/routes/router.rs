//! Router assembly.
//!
//! Chat routes and user routes are configured separately and combined
//! here, with tracing and CORS layers on the outside and an envelope-shaped
//! 404 fallback.

use axum::http::StatusCode;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::response::ApiResponse;
use crate::routes::chat_routes::configure_chat_routes;
use crate::routes::user_routes::configure_user_routes;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new();
    let router = configure_chat_routes(router);
    let router = configure_user_routes(router);

    router
        .fallback(|| async {
            ApiResponse::with_status(StatusCode::NOT_FOUND, "route not found", serde_json::json!({}))
        })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
