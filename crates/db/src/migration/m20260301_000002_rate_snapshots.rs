//! Append-only exchange rate snapshots.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(RATE_SNAPSHOTS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS rate_snapshots CASCADE;")
            .await?;
        Ok(())
    }
}

const RATE_SNAPSHOTS_SQL: &str = r"
CREATE TABLE rate_snapshots (
    id UUID PRIMARY KEY,
    provider VARCHAR(50) NOT NULL,
    base CHAR(3) NOT NULL,
    rates_json TEXT NOT NULL,
    fetched_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_base_upper CHECK (base = upper(base))
);

-- Latest snapshot per base
CREATE INDEX idx_rate_snapshots_latest ON rate_snapshots(base, created_at DESC, id DESC);
";
