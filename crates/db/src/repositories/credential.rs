//! Postgres credential store.
//!
//! Login rotation runs in one transaction holding `FOR UPDATE` on the user's
//! row, so concurrent logins for the same user queue up behind each other and
//! each sees the session its predecessor made current.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fxgate_core::StoreError;
use fxgate_core::auth::{CredentialStore, Session, SessionRotation, User};
use fxgate_shared::types::{SessionId, UserId};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QuerySelect,
    Set, TransactionTrait,
};
use tracing::debug;

use super::error::store_err;
use super::session::{SessionRepository, revoke_live};
use super::user::UserRepository;
use crate::entities::{sessions, users};

/// Credential store over the `users` and `sessions` tables.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    db: DatabaseConnection,
    users: UserRepository,
    sessions: SessionRepository,
}

impl CredentialRepository {
    /// Creates a new credential repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            sessions: SessionRepository::new(db.clone()),
            db,
        }
    }

    /// Session repository sharing this pool.
    #[must_use]
    pub const fn sessions(&self) -> &SessionRepository {
        &self.sessions
    }

    async fn rotate_in(
        txn: &DatabaseTransaction,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRotation>, DbErr> {
        let Some(user) = users::Entity::find_by_id(user_id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
        else {
            return Ok(None);
        };

        let mut revoked = None;
        if let Some(previous) = user.current_session_id.map(SessionId::from_uuid)
            && revoke_live(txn, previous, now).await?
        {
            revoked = Some(previous);
        }

        let session = sessions::ActiveModel {
            id: Set(SessionId::new().into_inner()),
            user_id: Set(user.id),
            created_at: Set(now.into()),
            revoked_at: Set(None),
        }
        .insert(txn)
        .await?;

        let mut pointer: users::ActiveModel = user.into();
        pointer.current_session_id = Set(Some(session.id));
        pointer.updated_at = Set(now.into());
        pointer.update(txn).await?;

        Ok(Some(SessionRotation {
            session: session.into(),
            revoked,
        }))
    }
}

#[async_trait]
impl CredentialStore for CredentialRepository {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        self.users
            .create(email, password_hash)
            .await
            .map(User::from)
            .map_err(store_err)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.users
            .find_by_id(id)
            .await
            .map(|m| m.map(User::from))
            .map_err(store_err)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.users
            .find_by_email(email)
            .await
            .map(|m| m.map(User::from))
            .map_err(store_err)
    }

    async fn find_session(&self, id: SessionId) -> Result<Option<Session>, StoreError> {
        self.sessions
            .find_by_id(id)
            .await
            .map(|m| m.map(Session::from))
            .map_err(store_err)
    }

    async fn rotate_session(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<SessionRotation, StoreError> {
        let txn = self.db.begin().await.map_err(store_err)?;

        // Dropping the transaction on an early return rolls it back.
        let rotation = Self::rotate_in(&txn, user_id, now)
            .await
            .map_err(store_err)?
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;

        txn.commit().await.map_err(store_err)?;

        debug!(
            user_id = %user_id,
            session_id = %rotation.session.id,
            "Rotated session"
        );
        Ok(rotation)
    }

    async fn revoke_session(&self, id: SessionId, now: DateTime<Utc>) -> Result<bool, StoreError> {
        if self.sessions.revoke(id, now).await.map_err(store_err)? {
            return Ok(true);
        }
        match self.sessions.find_by_id(id).await.map_err(store_err)? {
            Some(_) => Ok(false),
            None => Err(StoreError::NotFound(format!("session {id}"))),
        }
    }
}
