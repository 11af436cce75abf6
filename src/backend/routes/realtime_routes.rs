/**
 * Realtime Routes
 *
 * Both transports register with the same notification hub, so a client
 * may use either one.
 */
use axum::{routing::get, Router};

use crate::backend::realtime::{handle_realtime_subscription, handle_websocket};
use crate::backend::server::state::AppState;

pub fn configure_realtime_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/ws", get(handle_websocket))
        .route("/realtime", get(handle_realtime_subscription))
}
