//! Message Endpoints
//!
//! HTTP surface of the exchange core. Every route here sits behind the auth
//! middleware.
//!
//! - **`POST /message/text`** - create a TEXT message from `{"text": "..."}`
//! - **`POST /message/file`** - create a FILE message from a multipart `file` part
//! - **`GET /message/list`** - `{count, limit, offset, messages}`, newest first
//! - **`GET /message/{id}`** - the message record as JSON
//! - **`GET /message/content/{id}`** - the message body (text or file bytes)

/// HTTP handlers
pub mod handlers;

/// Message body rendering
pub mod render;

pub use handlers::{
    create_file_message, create_text_message, get_message, get_message_content, list_messages,
};
pub use render::{render_content, RenderedContent};
