//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// JWT claims issued by the hosted auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id (standard JWT `sub` claim).
    pub sub: String,
    /// User email.
    #[serde(default)]
    pub email: String,
    /// Provider role, e.g. `"authenticated"`.
    #[serde(default)]
    pub role: Option<String>,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}
