//! JWT session tokens.
//!
//! HS256 tokens with a 72-hour expiry, issued at signup and sign-in. The
//! secret comes from configuration; nothing here touches the environment.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::AppError;

/// Token lifetime in seconds.
const TOKEN_TTL_SECS: u64 = 72 * 60 * 60;

/// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Create a session token for a user.
///
/// # Arguments
/// * `user_id` - User ID (UUID)
/// * `email` - User email
/// * `secret` - HS256 signing secret
///
/// # Returns
/// Signed JWT token string
pub fn create_token(user_id: Uuid, email: &str, secret: &str) -> Result<String, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::storage(format!("system clock before epoch: {e}")))?
        .as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: now + TOKEN_TTL_SECS,
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.as_ref());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::storage(format!("failed to sign token: {e}")))
}

/// Verify a session token and return its claims.
///
/// # Arguments
/// * `token` - JWT token string
/// * `secret` - HS256 signing secret
///
/// # Returns
/// Decoded claims, or `Unauthorized` for an invalid or expired token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::unauthorized(format!("invalid token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, "test@example.com", SECRET).unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(verify_token("invalid.token.here", SECRET).is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = create_token(Uuid::new_v4(), "test@example.com", SECRET).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }
}
