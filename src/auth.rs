//! Bearer-token authentication.
//!
//! Tokens are minted by the external login service; this module only
//! validates them and exposes the caller's identity to handlers. Signing
//! lives here too so tests (and the issuer) share one claims layout.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AppState;
use crate::error::Error;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user id.
    pub sub: Uuid,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Signs a token for `user_id`, valid for `lifetime_secs`.
pub fn sign_token(user_id: Uuid, secret: &str, lifetime_secs: i64) -> Result<String, Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::seconds(lifetime_secs)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("failed to sign token: {e}")))
}

/// Validates signature and expiry, returning the claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::SessionExpired,
        _ => Error::InvalidToken,
    })
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ").map(str::trim)
}

/// Authenticated caller, pulled from the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(Error::MissingToken)?;
        let token = extract_bearer_token(header).ok_or(Error::MissingToken)?;
        let claims = verify_token(token, &state.config.jwt_secret)?;
        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = sign_token(user_id, "test-secret", 3600).unwrap();
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_token(Uuid::new_v4(), "test-secret", 3600).unwrap();
        let err = verify_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, Error::InvalidToken));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the validator's default leeway.
        let token = sign_token(Uuid::new_v4(), "test-secret", -120).unwrap();
        let err = verify_token(&token, "test-secret").unwrap_err();
        assert!(matches!(err, Error::SessionExpired));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = verify_token("not-a-jwt", "test-secret").unwrap_err();
        assert!(matches!(err, Error::InvalidToken));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
    }
}
