//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`config`** - `ServerConfig`, environment loading and the optional
//!   database connection
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`init`** - `create_app`, wiring store, hub and services together
//!
//! # Example
//!
//! ```rust,no_run
//! use roomlog::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::builder().port(8080).build()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Server configuration loading
pub mod config;

/// Application state management
pub mod state;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::{assemble_state, create_app};
pub use state::AppState;
