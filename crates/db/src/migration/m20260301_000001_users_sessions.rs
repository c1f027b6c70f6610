//! Users and sessions.
//!
//! `users.current_session_id` and `sessions.user_id` point at each other, so
//! the pointer's foreign key is added after both tables exist.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(SESSIONS_SQL).await?;
        db.execute_unprepared(CURRENT_SESSION_FK_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "ALTER TABLE IF EXISTS users DROP CONSTRAINT IF EXISTS fk_users_current_session;",
        )
        .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS sessions CASCADE;")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS users CASCADE;")
            .await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    current_session_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_email_lowercase CHECK (email = lower(email))
);
";

const SESSIONS_SQL: &str = r"
CREATE TABLE sessions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    revoked_at TIMESTAMPTZ,
    CONSTRAINT chk_revoked_after_created CHECK (revoked_at IS NULL OR revoked_at >= created_at)
);

-- Live sessions per user
CREATE INDEX idx_sessions_user_live ON sessions(user_id) WHERE revoked_at IS NULL;
";

const CURRENT_SESSION_FK_SQL: &str = r"
ALTER TABLE users
    ADD CONSTRAINT fk_users_current_session
    FOREIGN KEY (current_session_id) REFERENCES sessions(id) ON DELETE SET NULL;
";
