/**
 * Register Handler
 *
 * `POST /account/register` with `{"login": "...", "password": "..."}`.
 *
 * # Responses
 *
 * * `201 Created` - `{"credential": "Basic ..."}`, for a new account or a
 *   repeated registration with the same password
 * * `400 Bad Request` - body is not JSON, or a field is missing, not a
 *   string, or empty
 * * `409 Conflict` - the login exists with a different password
 */
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use super::types::{RegisterRequest, RegisterResponse};
use crate::backend::auth::AccountService;
use crate::backend::error::BackendError;
use crate::backend::extract::{json_body, string_field};

pub async fn register(
    State(accounts): State<AccountService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), BackendError> {
    let body = json_body(payload)?;
    let request = RegisterRequest {
        login: string_field(&body, "login")?,
        password: string_field(&body, "password")?,
    };
    tracing::info!("[Auth] Register request for '{}'", request.login);

    let credential = accounts.register(&request.login, &request.password).await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { credential })))
}
