//! Rate snapshot repository.

use async_trait::async_trait;
use chrono::Utc;
use fxgate_core::StoreError;
use fxgate_core::currency::{NewRateSnapshot, RateSnapshot, RateSnapshotStore};
use fxgate_shared::types::SnapshotId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::error::store_err;
use crate::entities::rate_snapshots;

impl From<rate_snapshots::Model> for RateSnapshot {
    fn from(model: rate_snapshots::Model) -> Self {
        Self {
            id: SnapshotId::from_uuid(model.id),
            provider: model.provider,
            base: model.base,
            rates_json: model.rates_json,
            fetched_at: model.fetched_at.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Append-only store over the `rate_snapshots` table.
#[derive(Debug, Clone)]
pub struct RateSnapshotRepository {
    db: DatabaseConnection,
}

impl RateSnapshotRepository {
    /// Creates a new rate snapshot repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RateSnapshotStore for RateSnapshotRepository {
    async fn insert(&self, snapshot: NewRateSnapshot) -> Result<RateSnapshot, StoreError> {
        let row = rate_snapshots::ActiveModel {
            id: Set(SnapshotId::new().into_inner()),
            provider: Set(snapshot.provider),
            base: Set(snapshot.base),
            rates_json: Set(snapshot.rates_json),
            fetched_at: Set(snapshot.fetched_at.into()),
            created_at: Set(Utc::now().into()),
        };

        row.insert(&self.db)
            .await
            .map(RateSnapshot::from)
            .map_err(store_err)
    }

    async fn find_latest(&self, base: &str) -> Result<Option<RateSnapshot>, StoreError> {
        rate_snapshots::Entity::find()
            .filter(rate_snapshots::Column::Base.eq(base))
            .order_by_desc(rate_snapshots::Column::CreatedAt)
            .order_by_desc(rate_snapshots::Column::Id)
            .one(&self.db)
            .await
            .map(|m| m.map(RateSnapshot::from))
            .map_err(store_err)
    }
}
