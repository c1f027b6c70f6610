//! Session repository for database operations.

use chrono::{DateTime, Utc};
use fxgate_core::auth::Session;
use fxgate_shared::types::{SessionId, UserId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter,
};

use crate::entities::sessions;

impl From<sessions::Model> for Session {
    fn from(model: sessions::Model) -> Self {
        Self {
            id: SessionId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            created_at: model.created_at.with_timezone(&Utc),
            revoked_at: model.revoked_at.map(|at| at.with_timezone(&Utc)),
        }
    }
}

/// Session repository for lookups and revocation.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: SessionId) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Revokes a session if it is still live.
    ///
    /// Returns whether this call set `revoked_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke(&self, id: SessionId, now: DateTime<Utc>) -> Result<bool, DbErr> {
        revoke_live(&self.db, id, now).await
    }

    /// Counts sessions of a user that are not revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_live_sessions(&self, user_id: UserId) -> Result<u64, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::UserId.eq(user_id.into_inner()))
            .filter(sessions::Column::RevokedAt.is_null())
            .count(&self.db)
            .await
    }
}

/// Sets `revoked_at` on a live session. Never touches an already revoked one.
pub(crate) async fn revoke_live<C: ConnectionTrait>(
    conn: &C,
    id: SessionId,
    now: DateTime<Utc>,
) -> Result<bool, DbErr> {
    let result = sessions::Entity::update_many()
        .col_expr(sessions::Column::RevokedAt, Expr::value(now))
        .filter(sessions::Column::Id.eq(id.into_inner()))
        .filter(sessions::Column::RevokedAt.is_null())
        .exec(conn)
        .await?;

    Ok(result.rows_affected > 0)
}
