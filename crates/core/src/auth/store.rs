//! Credential store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fxgate_shared::types::{SessionId, UserId};

use super::{Session, User};
use crate::store::StoreError;

/// Outcome of a login's session rotation.
#[derive(Debug, Clone)]
pub struct SessionRotation {
    /// The freshly created, now current session.
    pub session: Session,
    /// The previously current session, if this rotation revoked it.
    pub revoked: Option<SessionId>,
}

/// Durable storage for users and sessions.
///
/// Emails passed in are already normalized.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a user; `StoreError::Conflict` if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    /// Finds a user by ID.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Finds a user by normalized email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Finds a session by ID.
    async fn find_session(&self, id: SessionId) -> Result<Option<Session>, StoreError>;

    /// Revokes the user's current session (if live), creates a new session and
    /// makes it current.
    ///
    /// Implementations must apply the whole sequence atomically per user: two
    /// concurrent rotations for one user must never leave two live sessions.
    async fn rotate_session(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<SessionRotation, StoreError>;

    /// Sets `revoked_at` if it is still unset. Returns whether this call revoked it.
    async fn revoke_session(&self, id: SessionId, now: DateTime<Utc>) -> Result<bool, StoreError>;
}
