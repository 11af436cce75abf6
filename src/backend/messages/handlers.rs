/**
 * Message Handlers
 *
 * Thin adapters between HTTP and `MessageExchange`. The author of a new
 * message is always the authenticated caller.
 *
 * # Responses
 *
 * * `POST /message/text`, `POST /message/file` - `201 Created` with the
 *   message record
 * * `GET /message/list` - `200 OK` with a page
 * * `GET /message/{id}` - `200 OK` with the record
 * * `GET /message/content/{id}` - `200 OK` with the text or file bytes
 *
 * Errors are `BackendError`s; see `backend::error` for the id table.
 */
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::blob::BlobStore;
use crate::backend::error::BackendError;
use crate::backend::exchange::{MessageExchange, PageQuery, Pagination};
use crate::backend::extract::{json_body, string_field};
use crate::backend::messages::render::{render_content, RenderedContent};
use crate::backend::middleware::AuthUser;
use crate::shared::{Message, MessagePage, MessageType};

const FILE_FIELD: &str = "file";

/// POST /message/text
pub async fn create_text_message(
    State(exchange): State<MessageExchange>,
    AuthUser(identity): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), BackendError> {
    let body = json_body(payload)?;
    let text = string_field(&body, "text")?;

    let message = exchange
        .create_message(MessageType::Text, text, identity.id)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /message/file
///
/// Expects `multipart/form-data` with a part named `file`. Other parts are
/// ignored. If the message cannot be created the stored blob is removed
/// again.
pub async fn create_file_message(
    State(exchange): State<MessageExchange>,
    State(blobs): State<Arc<dyn BlobStore>>,
    AuthUser(identity): AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Message>), BackendError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("[Messages] Not a multipart body: {}", e.body_text());
        BackendError::file_not_provided()
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        let reference = blobs.store(original_name.as_deref(), bytes).await?;

        return match exchange
            .create_message(MessageType::File, reference.clone(), identity.id)
            .await
        {
            Ok(message) => Ok((StatusCode::CREATED, Json(message))),
            Err(err) => {
                if let Err(cleanup) = blobs.remove(&reference).await {
                    tracing::warn!("[Messages] Could not remove blob {}: {}", reference, cleanup);
                }
                Err(err.into())
            }
        };
    }

    Err(BackendError::file_not_provided())
}

fn multipart_error(err: MultipartError) -> BackendError {
    let status = err.status();
    let id = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "PAYLOAD_TOO_LARGE"
    } else {
        "VALIDATION_ERROR"
    };
    BackendError::handler(status, id, err.body_text())
}

/// GET /message/list?limit=&offset=
pub async fn list_messages(
    State(exchange): State<MessageExchange>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MessagePage>, BackendError> {
    let page = exchange.list_messages(Pagination::from(query)).await?;
    Ok(Json(page))
}

/// GET /message/{id}
pub async fn get_message(
    State(exchange): State<MessageExchange>,
    Path(raw_id): Path<String>,
) -> Result<Json<Message>, BackendError> {
    let id = parse_message_id(&raw_id)?;
    Ok(Json(exchange.get_message(id).await?))
}

/// GET /message/content/{id}
pub async fn get_message_content(
    State(exchange): State<MessageExchange>,
    State(blobs): State<Arc<dyn BlobStore>>,
    Path(raw_id): Path<String>,
) -> Result<RenderedContent, BackendError> {
    let id = parse_message_id(&raw_id)?;
    let message = exchange.get_message(id).await?;
    Ok(render_content(&message, blobs.as_ref()).await?)
}

/// An id that is not a UUID names no message
fn parse_message_id(raw_id: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(raw_id).map_err(|_| BackendError::message_not_found(raw_id))
}
