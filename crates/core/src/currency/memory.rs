//! In-memory snapshot store.

use async_trait::async_trait;
use chrono::Utc;
use fxgate_shared::types::SnapshotId;
use tokio::sync::RwLock;

use super::snapshot::{NewRateSnapshot, RateSnapshot};
use super::store::RateSnapshotStore;
use crate::store::StoreError;

/// Snapshot store backed by a vector in insertion order.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<Vec<RateSnapshot>>,
}

impl MemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    /// True when nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }
}

#[async_trait]
impl RateSnapshotStore for MemorySnapshotStore {
    async fn insert(&self, snapshot: NewRateSnapshot) -> Result<RateSnapshot, StoreError> {
        let stored = RateSnapshot {
            id: SnapshotId::new(),
            provider: snapshot.provider,
            base: snapshot.base,
            rates_json: snapshot.rates_json,
            fetched_at: snapshot.fetched_at,
            created_at: Utc::now(),
        };
        self.snapshots.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_latest(&self, base: &str) -> Result<Option<RateSnapshot>, StoreError> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.iter().rev().find(|s| s.base == base).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_snapshot(base: &str, rates_json: &str) -> NewRateSnapshot {
        NewRateSnapshot {
            provider: "stub".into(),
            base: base.into(),
            rates_json: rates_json.into(),
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_latest_is_last_inserted_for_base() {
        let store = MemorySnapshotStore::new();
        store.insert(new_snapshot("USD", r#"{"EUR":"0.9"}"#)).await.unwrap();
        store.insert(new_snapshot("EUR", r#"{"USD":"1.1"}"#)).await.unwrap();
        let last = store.insert(new_snapshot("USD", r#"{"EUR":"0.8"}"#)).await.unwrap();

        let latest = store.find_latest("USD").await.unwrap().unwrap();
        assert_eq!(latest.id, last.id);
        assert_eq!(latest.rates_json, r#"{"EUR":"0.8"}"#);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_latest_for_unknown_base_is_none() {
        let store = MemorySnapshotStore::new();
        assert!(store.is_empty().await);
        assert!(store.find_latest("GBP").await.unwrap().is_none());
    }
}
