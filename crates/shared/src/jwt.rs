//! JWT token generation and validation.
//!
//! Tokens are signed with HS256 and nothing else. The accepted algorithm is
//! pinned on both sides, so a token whose header names another algorithm
//! (including `none`) is rejected before its signature is even looked at.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use crate::auth::Claims;
use crate::types::{SessionId, UserId};

/// The only signing algorithm this service issues or accepts.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime.
    pub token_ttl: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            token_ttl: Duration::hours(24),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is malformed, tampered with, or signed with another key or algorithm.
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_ttl", &self.config.token_ttl)
            .field("secret", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Lifetime applied by [`JwtService::mint_default`].
    #[must_use]
    pub const fn token_ttl(&self) -> Duration {
        self.config.token_ttl
    }

    /// Mints a token bound to `session_id` that expires `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn mint(
        &self,
        user_id: UserId,
        session_id: SessionId,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), JwtError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + ttl;
        let claims = Claims::new(user_id, session_id, issued_at, expires_at);

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, expires_at))
    }

    /// Mints a token with the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn mint_default(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<(String, DateTime<Utc>), JwtError> {
        self.mint(user_id, session_id, self.config.token_ttl)
    }

    /// Validates signature, algorithm and expiry, then returns the claims.
    ///
    /// This does not say anything about whether the session is still live.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::Invalid` for every other rejection.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            token_ttl: Duration::hours(24),
        })
    }

    #[test]
    fn test_mint_and_verify() {
        let service = create_test_service();
        let user_id = UserId::new();
        let session_id = SessionId::new();

        let (token, expires_at) = service.mint_default(user_id, session_id).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.session_id(), session_id);
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        let (token, _) = service
            .mint(UserId::new(), SessionId::new(), Duration::hours(-2))
            .unwrap();

        assert!(matches!(service.verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        let result = service.verify("invalid.token.here");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }
}
