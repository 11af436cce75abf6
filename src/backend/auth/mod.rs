//! Authentication Module
//!
//! Accounts and caller identity for the message endpoints.
//!
//! # Architecture
//!
//! - **`resolver`** - `IdentityResolver` trait and the `BasicAuthResolver`
//!   that maps an `Authorization: Basic ...` header to `{id, login}`
//! - **`accounts`** - `AccountService`, idempotent registration with bcrypt
//! - **`handlers`** - `POST /account/register`
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs        - Errors and exports
//! ├── resolver.rs   - Credential parsing and identity resolution
//! ├── accounts.rs   - Registration
//! └── handlers/     - HTTP handlers
//!     ├── mod.rs
//!     ├── types.rs    - Request/response bodies
//!     └── register.rs - Register handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: `{login, password}` → account created or password
//!    verified → `Basic base64(login:hash)` returned
//! 2. **Message calls**: the credential is sent as `Authorization`; the auth
//!    middleware resolves it and attaches the `Identity` to the request

use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Identity resolution
pub mod resolver;

/// Account registration
pub mod accounts;

/// HTTP handlers for account endpoints
pub mod handlers;

pub use accounts::AccountService;
pub use handlers::register;
pub use resolver::{basic_credential, BasicAuthResolver, Identity, IdentityResolver};

/// Failure to resolve a caller identity
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("Authorization header is required")]
    Missing,

    /// Header present but not a decodable `Basic` credential
    #[error("Authorization header is malformed")]
    Malformed,

    /// Unknown login or wrong secret
    #[error("Credentials were rejected")]
    Rejected,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure to register an account
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] SharedError),

    /// The login exists and the password does not match it
    #[error("Password does not match the existing account")]
    PasswordMismatch,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
