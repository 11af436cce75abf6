//! Route Configuration Module
//!
//! HTTP routes of the server, grouped by concern.
//!
//! # Architecture
//!
//! - **`router`** - `create_router`, assembling every group plus the CORS,
//!   trace and body-limit layers
//! - **`api_routes`** - account and message endpoints
//! - **`realtime_routes`** - WebSocket and SSE subscriptions
//!
//! # Routes
//!
//! ## Accounts
//!
//! - `POST /account/register` - register or log back in
//!
//! ## Messages (authenticated)
//!
//! - `POST /message/text` - create a text message
//! - `POST /message/file` - create a file message
//! - `GET /message/list` - newest-first page of the history
//! - `GET /message/{id}` - one message record
//! - `GET /message/content/{id}` - message body
//!
//! ## Realtime
//!
//! - `GET /ws` - WebSocket, one `{"event","data"}` text frame per new message
//! - `GET /realtime` - Server-Sent Events, `event: NEW_MESSAGE`

/// Main router creation
pub mod router;

/// Account and message routes
pub mod api_routes;

/// Realtime subscription routes
pub mod realtime_routes;

pub use router::create_router;
