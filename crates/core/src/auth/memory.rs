//! In-memory credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fxgate_shared::types::{SessionId, UserId};
use tokio::sync::Mutex;

use super::store::{CredentialStore, SessionRotation};
use super::{Session, User};
use crate::store::StoreError;

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, User>,
    emails: HashMap<String, UserId>,
    sessions: HashMap<SessionId, Session>,
}

/// Credential store kept behind a single async mutex.
///
/// Holding the one lock across a whole rotation gives the same per-user
/// atomicity the database store gets from its row lock.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Inner>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions of `user_id` that are not revoked.
    pub async fn live_session_count(&self, user_id: UserId) -> usize {
        self.inner
            .lock()
            .await
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && !s.is_revoked())
            .count()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.emails.contains_key(email) {
            return Err(StoreError::Conflict(format!("email {email}")));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            current_session_id: None,
            created_at: now,
            updated_at: now,
        };
        inner.emails.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .emails
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_session(&self, id: SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.inner.lock().await.sessions.get(&id).cloned())
    }

    async fn rotate_session(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<SessionRotation, StoreError> {
        let mut inner = self.inner.lock().await;

        let previous = inner
            .users
            .get(&user_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?
            .current_session_id;

        let revoked = previous.and_then(|prev_id| {
            let prev = inner.sessions.get_mut(&prev_id)?;
            if prev.is_revoked() {
                return None;
            }
            prev.revoked_at = Some(now);
            Some(prev_id)
        });

        let session = Session {
            id: SessionId::new(),
            user_id,
            created_at: now,
            revoked_at: None,
        };
        inner.sessions.insert(session.id, session.clone());

        if let Some(user) = inner.users.get_mut(&user_id) {
            user.current_session_id = Some(session.id);
            user.updated_at = now;
        }

        Ok(SessionRotation { session, revoked })
    }

    async fn revoke_session(&self, id: SessionId, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("session {id}")))?;

        if session.is_revoked() {
            return Ok(false);
        }
        session.revoked_at = Some(now);
        Ok(true)
    }
}
