//! Test doubles for the engine contract tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zonewatch_core::error::{Error, Result};
use zonewatch_core::record::{Record, RecordSet, RecordType};
use zonewatch_core::traits::{RecordSource, SnapshotStore, WriteOutcome};
use zonewatch_core::MemorySnapshotStore;

/// A record source that replays a scripted sequence of fetch results.
///
/// Once the script runs out it keeps returning the final entry, so a
/// still-running engine sees a stable zone.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<RecordSet>>>,
    last: Mutex<Option<RecordSet>>,
    fetch_count: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<RecordSet>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(None),
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        self.fetch_count.clone()
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn fetch_records(&self, _filter: Option<RecordType>) -> Result<RecordSet> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(set)) => {
                *self.last.lock().unwrap() = Some(set.clone());
                Ok(set)
            }
            Some(Err(e)) => Err(e),
            None => {
                let last = self.last.lock().unwrap().clone();
                Ok(last.unwrap_or_default())
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A snapshot store that counts calls while delegating to a shared
/// [`MemorySnapshotStore`].
pub struct CountingStore {
    inner: MemorySnapshotStore,
    write_count: Arc<AtomicUsize>,
    mark_count: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemorySnapshotStore::new(),
            write_count: Arc::new(AtomicUsize::new(0)),
            mark_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A second handle over the same state and counters.
    pub fn handle(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            write_count: self.write_count.clone(),
            mark_count: self.mark_count.clone(),
        }
    }

    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    pub fn mark_count(&self) -> usize {
        self.mark_count.load(Ordering::SeqCst)
    }

    pub async fn seed(&self, snapshot: RecordSet) {
        self.inner.seed(snapshot).await;
    }
}

#[async_trait]
impl SnapshotStore for CountingStore {
    async fn read(&self) -> Result<Option<RecordSet>> {
        self.inner.read().await
    }

    async fn write(&self, snapshot: &RecordSet) -> Result<WriteOutcome> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.inner.write(snapshot).await
    }

    async fn mark_validation_complete(&self) -> Result<()> {
        self.mark_count.fetch_add(1, Ordering::SeqCst);
        self.inner.mark_validation_complete().await
    }

    async fn validation_complete(&self) -> Result<bool> {
        self.inner.validation_complete().await
    }
}

/// A store whose every operation fails, for loop-resilience tests.
pub struct BrokenStore;

#[async_trait]
impl SnapshotStore for BrokenStore {
    async fn read(&self) -> Result<Option<RecordSet>> {
        Err(Error::store("connection refused"))
    }

    async fn write(&self, _snapshot: &RecordSet) -> Result<WriteOutcome> {
        Err(Error::store("connection refused"))
    }

    async fn mark_validation_complete(&self) -> Result<()> {
        Err(Error::store("connection refused"))
    }

    async fn validation_complete(&self) -> Result<bool> {
        Err(Error::store("connection refused"))
    }
}

pub fn txt(name: &str, value: &str) -> Record {
    Record::new(name, value, RecordType::Txt)
}

pub fn txt_set(entries: &[(&str, &str)]) -> RecordSet {
    entries.iter().map(|(n, v)| txt(n, v)).collect()
}
