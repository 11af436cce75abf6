/**
 * Backend Error Types
 *
 * `BackendError` is what every handler returns. It wraps the errors of the
 * layers below (exchange, blob store, auth, registration) and maps each of
 * them onto an HTTP status and a stable error id.
 *
 * # Error Ids
 *
 * | id                          | status |
 * |-----------------------------|--------|
 * | `VALIDATION_ERROR`          | 400    |
 * | `FILE_NOT_PROVIDED`         | 400    |
 * | `UNSUPPORTED_MESSAGE_TYPE`  | 400    |
 * | `AUTH_NOT_PROVIDED`         | 401    |
 * | `AUTH_REJECTED`             | 401    |
 * | `MESSAGE_NOT_FOUND`         | 404    |
 * | `FILE_NOT_FOUND`            | 404    |
 * | `ACCOUNT_PASSWORD_MISMATCH` | 409    |
 * | `PERSISTENCE_ERROR`         | 500    |
 * | `INTERNAL_ERROR`            | 500    |
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::{AuthError, RegistrationError};
use crate::backend::blob::BlobError;
use crate::backend::exchange::ExchangeError;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Error raised directly by a handler
    #[error("{message}")]
    HandlerError {
        status: StatusCode,
        id: &'static str,
        message: String,
    },

    #[error(transparent)]
    Validation(#[from] SharedError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl BackendError {
    pub fn handler(status: StatusCode, id: &'static str, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            id,
            message: message.into(),
        }
    }

    /// Multipart upload without a `file` part
    pub fn file_not_provided() -> Self {
        Self::handler(
            StatusCode::BAD_REQUEST,
            "FILE_NOT_PROVIDED",
            "a multipart part named 'file' is required",
        )
    }

    /// Message id that cannot name any message
    pub fn message_not_found(raw_id: &str) -> Self {
        Self::handler(
            StatusCode::NOT_FOUND,
            "MESSAGE_NOT_FOUND",
            format!("Message {} not found", raw_id),
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(AuthError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Registration(err) => match err {
                RegistrationError::Validation(_) => StatusCode::BAD_REQUEST,
                RegistrationError::PasswordMismatch => StatusCode::CONFLICT,
                RegistrationError::Hashing(_) | RegistrationError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Exchange(err) => match err {
                ExchangeError::Validation(_) => StatusCode::BAD_REQUEST,
                ExchangeError::NotFound(_) => StatusCode::NOT_FOUND,
                ExchangeError::Persistence(StoreError::UnsupportedType(_)) => {
                    StatusCode::BAD_REQUEST
                }
                ExchangeError::Persistence(_) | ExchangeError::Interrupted(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Blob(BlobError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Blob(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Stable identifier sent as `id` in the error body
    pub fn error_id(&self) -> &'static str {
        match self {
            Self::HandlerError { id, .. } => *id,
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Auth(err) => match err {
                AuthError::Missing => "AUTH_NOT_PROVIDED",
                AuthError::Malformed | AuthError::Rejected => "AUTH_REJECTED",
                AuthError::Store(_) => "PERSISTENCE_ERROR",
            },
            Self::Registration(err) => match err {
                RegistrationError::Validation(_) => "VALIDATION_ERROR",
                RegistrationError::PasswordMismatch => "ACCOUNT_PASSWORD_MISMATCH",
                RegistrationError::Hashing(_) => "INTERNAL_ERROR",
                RegistrationError::Store(_) => "PERSISTENCE_ERROR",
            },
            Self::Exchange(err) => match err {
                ExchangeError::Validation(_) => "VALIDATION_ERROR",
                ExchangeError::NotFound(_) => "MESSAGE_NOT_FOUND",
                ExchangeError::Persistence(StoreError::UnsupportedType(_)) => {
                    "UNSUPPORTED_MESSAGE_TYPE"
                }
                ExchangeError::Persistence(_) => "PERSISTENCE_ERROR",
                ExchangeError::Interrupted(_) => "INTERNAL_ERROR",
            },
            Self::Blob(BlobError::Io(_)) => "INTERNAL_ERROR",
            Self::Blob(_) => "FILE_NOT_FOUND",
        }
    }

    /// Message sent to the client
    pub fn message(&self) -> String {
        match self {
            Self::Validation(err)
            | Self::Exchange(ExchangeError::Validation(err))
            | Self::Registration(RegistrationError::Validation(err)) => match err {
                SharedError::ValidationError { message, .. } => message.clone(),
                SharedError::SerializationError { message } => message.clone(),
            },
            other => other.to_string(),
        }
    }
}
