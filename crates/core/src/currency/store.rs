//! Rate snapshot store contract.

use async_trait::async_trait;

use super::snapshot::{NewRateSnapshot, RateSnapshot};
use crate::store::StoreError;

/// Append-only storage for rate snapshots.
#[async_trait]
pub trait RateSnapshotStore: Send + Sync {
    /// Appends a snapshot and returns it with its id and insertion time.
    async fn insert(&self, snapshot: NewRateSnapshot) -> Result<RateSnapshot, StoreError>;

    /// Most recently inserted snapshot for an upper-case `base`.
    async fn find_latest(&self, base: &str) -> Result<Option<RateSnapshot>, StoreError>;
}
