/**
 * Message Content Rendering
 *
 * Turns a message into the body served by `GET /message/content/{id}`:
 *
 * - `TEXT` → the text itself, `text/plain; charset=utf-8`
 * - `FILE` → the blob bytes, with a MIME type guessed from the reference
 *
 * Rows whose type is unknown never reach this point; the store rejects them
 * with `StoreError::UnsupportedType`, which the error layer serves as
 * `400 UNSUPPORTED_MESSAGE_TYPE`.
 */
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::backend::blob::{content_type_for, BlobError, BlobStore};
use crate::shared::{Message, MessageType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedContent {
    Text(String),
    File { bytes: Bytes, content_type: String },
}

pub async fn render_content(
    message: &Message,
    blobs: &dyn BlobStore,
) -> Result<RenderedContent, BlobError> {
    match message.message_type {
        MessageType::Text => Ok(RenderedContent::Text(message.content.clone())),
        MessageType::File => {
            let bytes = blobs.retrieve(&message.content).await?;
            Ok(RenderedContent::File {
                bytes,
                content_type: content_type_for(&message.content),
            })
        }
    }
}

impl IntoResponse for RenderedContent {
    fn into_response(self) -> Response {
        match self {
            Self::Text(text) => text.into_response(),
            Self::File {
                bytes,
                content_type,
            } => {
                let content_type = HeaderValue::from_str(&content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
                ([(CONTENT_TYPE, content_type)], bytes).into_response()
            }
        }
    }
}
