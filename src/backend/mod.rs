//! Backend Module
//!
//! Server-side code for roomlog: persistence, the message exchange core, the
//! notification hub and the Axum HTTP server around them.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`store`** - `MessageStore`/`AccountStore` traits, Postgres and in-memory
//!   implementations
//! - **`exchange`** - `MessageExchange`: create, get and list messages;
//!   publishes every created message
//! - **`realtime`** - `NotificationHub` fan-out, WebSocket and SSE transports
//! - **`blob`** - byte storage for file messages
//! - **`auth`** - registration and identity resolution
//! - **`messages`** - HTTP handlers over the exchange
//! - **`middleware`** - the auth middleware
//! - **`routes`** - route configuration and router assembly
//! - **`server`** - configuration, application state, initialization
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── main.rs         - Binary entry point
//! ├── store/          - Persistence
//! ├── exchange/       - Message exchange core
//! ├── realtime/       - Notification hub and transports
//! ├── blob/           - File storage
//! ├── auth/           - Accounts and identity
//! ├── messages/       - Message handlers
//! ├── middleware/     - Request middleware
//! ├── routes/         - Route configuration
//! ├── server/         - Config, state, init
//! ├── error/          - Error types
//! └── extract.rs      - JSON body helpers
//! ```
//!
//! # Message Flow
//!
//! 1. `POST /message/text` passes the auth middleware, which attaches the
//!    caller's `Identity`
//! 2. The handler calls `MessageExchange::create_message`
//! 3. The exchange inserts the row, re-reads it joined with the author, and
//!    hands it to the hub dispatcher
//! 4. The dispatcher publishes `NEW_MESSAGE` to every live connection
//! 5. The handler answers `201` with the same record
//!
//! # Error Handling
//!
//! Each layer has its own `thiserror` enum (`StoreError`, `ExchangeError`,
//! `AuthError`, `BlobError`). Handlers convert them into `BackendError` with
//! `?`, which renders as `{"id", "message"}`.

/// Message and account persistence
pub mod store;

/// Message exchange core
pub mod exchange;

/// Real-time notification system
pub mod realtime;

/// File blob storage
pub mod blob;

/// Accounts and identity
pub mod auth;

/// Message HTTP handlers
pub mod messages;

/// Middleware for request processing
pub mod middleware;

/// Route configuration
pub mod routes;

/// Server setup and configuration
pub mod server;

/// Backend error types
pub mod error;

/// JSON request body helpers
pub mod extract;

pub use error::BackendError;
pub use exchange::MessageExchange;
pub use realtime::NotificationHub;
pub use server::create_app;
