//! Authentication error types.

use fxgate_shared::{AppError, JwtError};
use thiserror::Error;

use super::password::PasswordError;
use crate::store::StoreError;

/// Errors raised by the session authenticator.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header.
    #[error("missing bearer token")]
    MissingToken,

    /// Bad signature, wrong algorithm, malformed or expired token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Token is well-formed but its session is no longer the user's live session.
    #[error("session has been revoked")]
    SessionRevoked,

    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Email already registered.
    #[error("email already registered")]
    EmailTaken,

    /// The new session could not be persisted.
    #[error("cannot create session: {0}")]
    SessionCreation(StoreError),

    /// Token signing failed.
    #[error("token error: {0}")]
    Token(JwtError),

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Credential store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Returns the internal error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidToken(_) => "invalid_token",
            Self::SessionRevoked => "session_revoked",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidInput(_) => "invalid_input",
            Self::EmailTaken => "email_taken",
            Self::SessionCreation(_) => "cannot_create_session",
            Self::Token(_) | Self::Password(_) | Self::Store(_) => "internal_error",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Self::unauthorized(
                "unauthorized",
                "Authorization header with Bearer token is required",
            ),
            AuthError::InvalidToken(_) => {
                Self::unauthorized("invalid_token", "Invalid or expired token")
            }
            AuthError::SessionRevoked => {
                Self::unauthorized("session_revoked", "Session is no longer active")
            }
            AuthError::InvalidCredentials => {
                Self::unauthorized("invalid_credentials", "Invalid email or password")
            }
            AuthError::InvalidInput(_) => Self::validation(
                "invalid_email_or_password",
                "A valid email and a password of at least 6 characters are required",
            ),
            AuthError::EmailTaken => {
                Self::conflict("email_taken", "An account with this email already exists")
            }
            AuthError::SessionCreation(e) => Self::Internal {
                code: "cannot_create_session",
                message: e.to_string(),
            },
            AuthError::Token(e) => Self::internal(e.to_string()),
            AuthError::Password(e) => Self::internal(e.to_string()),
            AuthError::Store(e) => Self::internal(e.to_string()),
        }
    }
}
