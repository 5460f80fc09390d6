//! In-memory snapshot store
//!
//! Holds the snapshot and validation flag behind an `RwLock`. Nothing
//! survives a restart, which is exactly what engine tests and embedded
//! callers want.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Error;
use crate::record::RecordSet;
use crate::traits::{SnapshotStore, WriteOutcome};

#[derive(Debug, Default)]
struct State {
    snapshot: Option<RecordSet>,
    validation_complete: bool,
}

/// In-memory [`SnapshotStore`] implementation.
///
/// Cloning is cheap and clones share state, so a test can keep a handle
/// while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    inner: Arc<RwLock<State>>,
}

impl MemorySnapshotStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load a snapshot, bypassing the compare-before-write path.
    pub async fn seed(&self, snapshot: RecordSet) {
        self.inner.write().await.snapshot = Some(snapshot);
    }

    /// Drop all state.
    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        guard.snapshot = None;
        guard.validation_complete = false;
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn read(&self) -> Result<Option<RecordSet>, Error> {
        Ok(self.inner.read().await.snapshot.clone())
    }

    async fn write(&self, snapshot: &RecordSet) -> Result<WriteOutcome, Error> {
        let mut guard = self.inner.write().await;
        if let Some(cached) = &guard.snapshot {
            if cached.matches(snapshot) {
                return Ok(WriteOutcome::Unchanged);
            }
        }
        guard.snapshot = Some(snapshot.clone());
        Ok(WriteOutcome::Updated)
    }

    async fn mark_validation_complete(&self) -> Result<(), Error> {
        self.inner.write().await.validation_complete = true;
        Ok(())
    }

    async fn validation_complete(&self) -> Result<bool, Error> {
        Ok(self.inner.read().await.validation_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordType};

    fn txt_snapshot(value: &str) -> RecordSet {
        vec![Record::new("_acme-challenge", value, RecordType::Txt)].into()
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let store = MemorySnapshotStore::new();
        assert_eq!(store.read().await.unwrap(), None);

        let snapshot = txt_snapshot("abc123");
        assert_eq!(store.write(&snapshot).await.unwrap(), WriteOutcome::Updated);
        assert_eq!(store.read().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn identical_write_is_a_noop() {
        let store = MemorySnapshotStore::new();
        let snapshot = txt_snapshot("abc123");

        assert_eq!(store.write(&snapshot).await.unwrap(), WriteOutcome::Updated);
        assert_eq!(
            store.write(&snapshot).await.unwrap(),
            WriteOutcome::Unchanged
        );
    }

    #[tokio::test]
    async fn changed_write_replaces_snapshot() {
        let store = MemorySnapshotStore::new();
        store.write(&txt_snapshot("abc")).await.unwrap();

        let newer = txt_snapshot("def");
        assert_eq!(store.write(&newer).await.unwrap(), WriteOutcome::Updated);
        assert_eq!(store.read().await.unwrap(), Some(newer));
    }

    #[tokio::test]
    async fn validation_flag_is_idempotent() {
        let store = MemorySnapshotStore::new();
        assert!(!store.validation_complete().await.unwrap());

        store.mark_validation_complete().await.unwrap();
        store.mark_validation_complete().await.unwrap();
        assert!(store.validation_complete().await.unwrap());
    }
}
