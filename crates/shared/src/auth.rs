//! Authentication types for tokens and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{SessionId, UserId};

/// JWT claims carried by every access token.
///
/// A token only proves who issued it and until when. Whether the session it
/// names is still alive is decided by the credential store on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: UserId,
    /// Session the token was minted for.
    pub sid: SessionId,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates claims issued at `issued_at` and expiring at `expires_at`.
    #[must_use]
    pub fn new(
        user_id: UserId,
        session_id: SessionId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id,
            sid: session_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.sub
    }

    /// Returns the session ID from claims.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.sid
    }
}

/// A freshly minted bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    /// Encoded JWT.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Session bound into the token.
    #[serde(skip)]
    pub session_id: SessionId,
    /// Expiry of the token.
    #[serde(skip)]
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Wraps an encoded token as a bearer credential.
    #[must_use]
    pub const fn bearer(
        access_token: String,
        session_id: SessionId,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            token_type: "Bearer",
            session_id,
            expires_at,
        }
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Public view of a registered user.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: UserId,
    /// Normalized email.
    pub email: String,
}
