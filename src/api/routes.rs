//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, list_handler, prune_handler,
    set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /caches` - List caches with their settings and statistics
/// - `GET /caches/:name/stats` - Statistics for one cache
/// - `DELETE /caches/:name` - Clear a cache and its backing file
/// - `POST /caches/:name/prune` - Drop expired entries
/// - `GET|PUT|DELETE /caches/:name/keys/:key` - Read, write or remove a key
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/caches", get(list_handler))
        .route("/caches/:name", delete(clear_handler))
        .route("/caches/:name/stats", get(stats_handler))
        .route("/caches/:name/prune", post(prune_handler))
        .route(
            "/caches/:name/keys/:key",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
