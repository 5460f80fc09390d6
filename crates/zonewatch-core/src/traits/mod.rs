//! Core traits for the zonewatch system
//!
//! These are the seams between the engine and the outside world:
//!
//! - [`RecordSource`]: fetch host records from a DNS provider API
//! - [`SnapshotStore`]: persist the last-seen snapshot and the
//!   validation-complete flag

pub mod record_source;
pub mod snapshot_store;

pub use record_source::RecordSource;
pub use snapshot_store::{SnapshotStore, WriteOutcome};
