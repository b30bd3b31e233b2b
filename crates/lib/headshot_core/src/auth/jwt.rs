//! JWT token generation and verification.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::info;

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Lifetime of locally minted tokens: 1 hour, matching the auth provider.
const ACCESS_TOKEN_EXPIRY_SECS: i64 = 60 * 60;

/// Mint a signed HS256 access token in the auth provider's shape.
pub fn generate_access_token(
    user_id: &str,
    email: &str,
    secret: &[u8],
) -> Result<String, AuthError> {
    if user_id.trim().is_empty() {
        return Err(AuthError::ValidationError("user id must not be empty".into()));
    }
    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: Some("authenticated".to_string()),
        exp: (now + Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

/// Verify a JWT access token, returning the claims on success.
pub fn verify_access_token(token: &str, secret: &[u8]) -> Option<TokenClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    // Provider tokens carry `aud: "authenticated"`; locally minted ones don't.
    validation.validate_aud = false;
    decode::<TokenClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
}

/// Resolve the JWT secret: env var `JWT_SECRET` → `AUTH_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("headshot")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn minted_token_round_trips_claims() {
        let token = generate_access_token("user-1", "a@example.com", SECRET).unwrap();
        let claims = verify_access_token(&token, SECRET).expect("valid token");
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token("user-1", "a@example.com", SECRET).unwrap();
        assert!(verify_access_token(&token, b"other-secret").is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: "user-1".into(),
            email: String::new(),
            role: None,
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        assert!(verify_access_token(&token, SECRET).is_none());
    }

    #[test]
    fn empty_user_id_is_rejected() {
        assert!(matches!(
            generate_access_token(" ", "a@example.com", SECRET),
            Err(AuthError::ValidationError(_))
        ));
    }
}
