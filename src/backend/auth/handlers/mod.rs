//! Account Handlers
//!
//! - **`register`** - POST /account/register

/// Request and response bodies
pub mod types;

/// Register handler
pub mod register;

pub use register::register;
pub use types::{RegisterRequest, RegisterResponse};
