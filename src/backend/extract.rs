//! Request body helpers
//!
//! Handlers take `Result<Json<Value>, JsonRejection>` so a malformed body is
//! reported as a `VALIDATION_ERROR` instead of axum's plain-text rejection.

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::shared::SharedError;

/// Unwrap a JSON body, turning a rejection into a validation error
pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, SharedError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!("[Extract] Rejected body: {}", rejection.body_text());
            Err(SharedError::validation("body", "request body must be a JSON object"))
        }
    }
}

/// Read `field` from a JSON object, which must be a string
pub fn string_field(body: &Value, field: &str) -> Result<String, SharedError> {
    match body.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        _ => Err(SharedError::validation(
            field,
            format!("{} should be a string", field),
        )),
    }
}
