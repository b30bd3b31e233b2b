//! Authentication logic.
//!
//! The hosted auth provider issues HS256 access tokens signed with a shared
//! secret; this module verifies them (and mints equivalent tokens for local
//! development and tests).

pub mod jwt;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
