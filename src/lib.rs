//! Roomlog - Shared Chat Room Message Log
//!
//! Roomlog is the server behind a single chat room. Clients post text or file
//! messages over HTTP; the server persists each one, places it in one global
//! ordered history, and immediately pushes it to every connected client over
//! WebSocket or Server-Sent Events.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared between server and clients
//!   - Joined message record, history page, real-time event envelope
//!   - Validation errors
//!
//! - **`backend`** - Server-side code (only compiled with the `ssr` feature,
//!   which is on by default)
//!   - `store` - Message and account persistence (Postgres or in-memory)
//!   - `exchange` - The message exchange core: create, get, list
//!   - `realtime` - Notification hub and its WebSocket/SSE transports
//!   - `auth`, `blob`, `messages`, `routes`, `server` - HTTP surface and wiring
//!
//! # Usage
//!
//! ```rust,no_run
//! use roomlog::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - The exchange core and notification hub are `Clone`/`Arc`-shared and safe
//!   to call from any number of request tasks at once
//! - Live connections are kept in a `DashMap`; publishing snapshots it and
//!   never awaits a subscriber

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
