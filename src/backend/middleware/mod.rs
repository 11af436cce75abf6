//! Middleware Module
//!
//! HTTP middleware applied in front of handlers.
//!
//! - **`auth`** - resolves the caller identity for the `/message` routes
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use roomlog::backend::middleware::auth_middleware;
//! use roomlog::backend::server::state::AppState;
//!
//! fn protect(routes: Router<AppState>, state: AppState) -> Router<AppState> {
//!     routes.route_layer(middleware::from_fn_with_state(state, auth_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{auth_middleware, AuthUser};
