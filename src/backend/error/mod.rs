//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their conversion to responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError`, its status codes and error ids
//! - **`conversion`** - `IntoResponse`, producing `{"id", "message"}` bodies
//!
//! # Example
//!
//! ```rust,no_run
//! use roomlog::backend::error::BackendError;
//!
//! async fn handler() -> Result<&'static str, BackendError> {
//!     Err(BackendError::file_not_provided())
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use conversion::ErrorBody;
pub use types::BackendError;
