//! Authentication middleware: bearer token extraction and JWT verification.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use headshot_core::auth::jwt::verify_access_token;
use headshot_core::models::auth::Identity;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// Verified caller, inserted by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

/// Caller on routes open to guests, inserted by [`optional_auth`].
#[derive(Debug, Clone)]
pub struct Caller(pub Option<Identity>);

fn bearer_identity(headers: &HeaderMap, secret: &[u8]) -> Result<Identity, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

    let claims = verify_access_token(token, secret)
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;
    Ok(claims.into())
}

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = bearer_identity(request.headers(), state.config.jwt_secret.as_bytes())?;
    request.extensions_mut().insert(AuthenticatedUser(identity));
    Ok(next.run(request).await)
}

/// Like [`require_auth`] but never rejects: a missing or invalid token makes
/// the caller a guest.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match bearer_identity(request.headers(), state.config.jwt_secret.as_bytes()) {
        Ok(identity) => Some(identity),
        Err(e) => {
            if request.headers().contains_key(AUTHORIZATION) {
                debug!(error = %e, "ignoring unusable bearer token");
            }
            None
        }
    };
    request.extensions_mut().insert(Caller(identity));
    next.run(request).await
}
