//! User repository for database operations.

use chrono::Utc;
use fxgate_core::auth::User;
use fxgate_shared::types::{SessionId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::entities::users;

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::from_uuid(model.id),
            email: model.email,
            password_hash: model.password_hash,
            current_session_id: model.current_session_id.map(SessionId::from_uuid),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Creates a new user without a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including a unique violation on `email`.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            current_session_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }
}
