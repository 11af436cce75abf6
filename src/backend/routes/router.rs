/**
 * Router Configuration
 *
 * Combines all route groups into the application router.
 *
 * # Layers
 *
 * - the auth middleware, on the `/message` routes only (`route_layer`, so
 *   unknown paths still 404 instead of 401)
 * - `DefaultBodyLimit`, set from `max_upload_bytes`
 * - CORS, restricted to `ALLOWED_ORIGIN` when configured
 * - `TraceLayer` for request spans
 */
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::backend::middleware::auth_middleware;
use crate::backend::routes::api_routes::{configure_account_routes, configure_message_routes};
use crate::backend::routes::realtime_routes::configure_realtime_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let message_routes = configure_message_routes(Router::new()).route_layer(
        middleware::from_fn_with_state(app_state.clone(), auth_middleware),
    );

    let router = Router::new().route("/", get(|| async { "roomlog" }));
    let router = configure_account_routes(router);
    let router = configure_realtime_routes(router);

    router
        .merge(message_routes)
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_bytes))
        .layer(cors_layer(&app_state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = match config.allowed_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(_)) => {
            tracing::warn!("[Router] Ignoring unparsable ALLOWED_ORIGIN, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
