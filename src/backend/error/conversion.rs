/**
 * Error Conversion
 *
 * `IntoResponse` for `BackendError`, so handlers can return it directly.
 *
 * # Response Format
 *
 * ```json
 * { "id": "MESSAGE_NOT_FOUND", "message": "Message ... not found" }
 * ```
 *
 * `401` responses also carry `WWW-Authenticate: Basic realm="roomlog"`.
 */
use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::backend::error::types::BackendError;

const AUTH_CHALLENGE: &str = "Basic realm=\"roomlog\"";

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub id: &'static str,
    pub message: String,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            id: self.error_id(),
            message: self.message(),
        };

        if status.is_server_error() {
            tracing::error!("[Http] {} {}: {}", status.as_u16(), body.id, self);
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("[Http] {} {}", status.as_u16(), body.id);
        } else {
            tracing::debug!("[Http] {} {}: {}", status.as_u16(), body.id, body.message);
        }

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_CHALLENGE));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::AuthError;
    use axum::body::to_bytes;
    use serde_json::Value;

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = BackendError::file_not_provided().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["id"], "FILE_NOT_PROVIDED");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_unauthorized_carries_challenge() {
        let response = BackendError::from(AuthError::Rejected).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            AUTH_CHALLENGE
        );
    }
}
