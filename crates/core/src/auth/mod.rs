//! Authentication, sessions, and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - The credential store contract and an in-memory implementation
//! - The session authenticator: login, registration, token verification
//!   and the per-request liveness check

mod error;
mod memory;
mod password;
mod service;
mod store;


pub use error::AuthError;
pub use memory::MemoryCredentialStore;
pub use password::{PasswordError, burn_verification, hash_password, verify_password};
pub use service::{AuthContext, MIN_PASSWORD_LEN, SessionAuthenticator, extract_bearer_token};
pub use store::{CredentialStore, SessionRotation};

use chrono::{DateTime, Utc};
use fxgate_shared::types::{SessionId, UserId};
use serde::Serialize;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Lower-cased, trimmed email; unique.
    pub email: String,
    /// Argon2id PHC string.
    #[serde(skip)]
    pub password_hash: String,
    /// The one session currently allowed to authenticate, if any.
    #[serde(skip)]
    pub current_session_id: Option<SessionId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// One login.
///
/// `revoked_at` is written at most once; a revoked session never comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session ID.
    pub id: SessionId,
    /// Owning user.
    pub user_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Revocation time.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Returns true once the session has been revoked.
    #[must_use]
    pub const fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Lower-cases and trims an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM \n"), "alice@example.com");
    }

    #[test]
    fn test_session_revocation_flag() {
        let mut session = Session {
            id: SessionId::new(),
            user_id: UserId::new(),
            created_at: Utc::now(),
            revoked_at: None,
        };
        assert!(!session.is_revoked());
        session.revoked_at = Some(Utc::now());
        assert!(session.is_revoked());
    }
}
