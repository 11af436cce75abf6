/**
 * Authentication Middleware
 *
 * Protects routes that need a caller identity. The middleware reads the
 * `Authorization` header, resolves it with the configured `IdentityResolver`
 * and stores the resulting `Identity` in the request extensions. Handlers
 * pick it up with the `AuthUser` extractor.
 *
 * A missing header is `401 AUTH_NOT_PROVIDED`; anything the resolver
 * refuses is `401 AUTH_REJECTED`.
 */
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::backend::auth::{AuthError, Identity, IdentityResolver};
use crate::backend::error::BackendError;

/// Authentication middleware
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn auth_middleware(
    State(resolver): State<Arc<dyn IdentityResolver>>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let credential = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("[Auth] Missing Authorization header on {}", request.uri().path());
            AuthError::Missing
        })?;

    let identity = resolver.resolve(credential).await?;
    tracing::debug!("[Auth] {} authenticated as {}", request.uri().path(), identity.login);

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extractor for the identity attached by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("[Auth] Identity not found in request extensions");
                AuthError::Missing.into()
            })
    }
}
