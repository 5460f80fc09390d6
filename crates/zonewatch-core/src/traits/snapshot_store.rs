//! Snapshot store trait
//!
//! The store keeps exactly two pieces of state per deployment: the last
//! persisted [`RecordSet`] snapshot and a validation-complete flag. Both
//! live in the same logical namespace of the backing key-value store.
//!
//! Store failures are returned to the caller as [`Error::Store`]; a store
//! implementation never terminates the process. The one-shot tool treats
//! store errors as fatal, the polling service logs them and carries on.

use async_trait::async_trait;

use crate::error::Error;
use crate::record::RecordSet;

/// Outcome of a conditional snapshot write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The snapshot differed (or none was cached) and was persisted
    Updated,
    /// The snapshot was structurally identical to the cached one; nothing
    /// was written
    Unchanged,
}

/// Trait for snapshot store implementations.
///
/// All methods must be safe to call concurrently, though the engine itself
/// is single-writer. The `read`-then-`write` sequence is not atomic: two
/// instances polling the same domain can race. That is an accepted
/// limitation, not something implementations should try to lock around.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Return the last persisted snapshot, or `None` if absent.
    async fn read(&self) -> Result<Option<RecordSet>, Error>;

    /// Persist `snapshot` unless a structurally equal set is already cached.
    ///
    /// Comparison is order-insensitive ([`RecordSet::matches`]). An equal
    /// snapshot is a no-op and reports [`WriteOutcome::Unchanged`].
    async fn write(&self, snapshot: &RecordSet) -> Result<WriteOutcome, Error>;

    /// Set the validation-complete flag. Idempotent; the flag is never
    /// cleared by this system.
    async fn mark_validation_complete(&self) -> Result<(), Error>;

    /// Whether the validation-complete flag is set.
    async fn validation_complete(&self) -> Result<bool, Error>;
}
