/**
 * Account Handler Types
 */
use serde::{Deserialize, Serialize};

/// Body of `POST /account/register`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
}

/// Response of `POST /account/register`
///
/// `credential` is the full `Authorization` header value to use on the
/// message endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegisterResponse {
    pub credential: String,
}
