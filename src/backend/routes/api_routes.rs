/**
 * API Routes
 *
 * Account and message endpoints. `configure_message_routes` only declares
 * the routes; `create_router` puts the auth middleware in front of them.
 */
use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::auth::register;
use crate::backend::messages::{
    create_file_message, create_text_message, get_message, get_message_content, list_messages,
};
use crate::backend::server::state::AppState;

/// Public account routes
pub fn configure_account_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/account/register", post(register))
}

/// Message routes, which expect an authenticated caller
pub fn configure_message_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/message/text", post(create_text_message))
        .route("/message/file", post(create_file_message))
        .route("/message/list", get(list_messages))
        .route("/message/content/{id}", get(get_message_content))
        .route("/message/{id}", get(get_message))
}
