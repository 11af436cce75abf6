/**
 * Identity Resolver
 *
 * Maps the `Authorization` header value to a caller identity `{id, login}`.
 *
 * # Credential Format
 *
 * `Basic <base64(login:secret)>`, where `secret` is either
 *
 * - the account's stored bcrypt hash, as handed out by `POST /account/register`
 * - or the plain password, verified with bcrypt
 *
 * Any other outcome is a rejection. Rejections are logged at `warn`.
 */
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use super::AuthError;
use crate::backend::store::AccountStore;

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub login: String,
}

/// Turns a credential string into an identity
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, credential: &str) -> Result<Identity, AuthError>;
}

/// Build the `Authorization` header value for `login:secret`
pub fn basic_credential(login: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", login, secret)))
}

/// Split a `Basic` credential into `(login, secret)`
pub fn parse_basic_credential(credential: &str) -> Result<(String, String), AuthError> {
    let (scheme, encoded) = credential
        .trim()
        .split_once(' ')
        .ok_or(AuthError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::Malformed);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::Malformed)?;

    let (login, secret) = decoded.split_once(':').ok_or(AuthError::Malformed)?;
    Ok((login.to_string(), secret.to_string()))
}

/// Constant-time check of `secret` against the issued hash
fn issued_secret_matches(secret: &str, password_hash: &str) -> bool {
    bool::from(secret.as_bytes().ct_eq(password_hash.as_bytes()))
}

/// Basic-auth resolver over the account store
#[derive(Clone)]
pub struct BasicAuthResolver {
    accounts: Arc<dyn AccountStore>,
}

impl BasicAuthResolver {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl IdentityResolver for BasicAuthResolver {
    async fn resolve(&self, credential: &str) -> Result<Identity, AuthError> {
        let (login, secret) = parse_basic_credential(credential).map_err(|e| {
            tracing::warn!("[Auth] Malformed credential");
            e
        })?;

        let account = self
            .accounts
            .find_account_by_login(&login)
            .await?
            .ok_or_else(|| {
                tracing::warn!("[Auth] Unknown login '{}'", login);
                AuthError::Rejected
            })?;

        let accepted = if issued_secret_matches(&secret, &account.password_hash) {
            true
        } else {
            let hash = account.password_hash.clone();
            tokio::task::spawn_blocking(move || bcrypt::verify(secret, &hash).unwrap_or(false))
                .await
                .unwrap_or(false)
        };

        if !accepted {
            tracing::warn!("[Auth] Wrong password for '{}'", login);
            return Err(AuthError::Rejected);
        }

        Ok(Identity {
            id: account.id,
            login: account.login,
        })
    }
}
