//! # zonewatch-core
//!
//! Core library for the zonewatch DNS record watcher.
//!
//! zonewatch polls a DNS provider for the host records of one domain,
//! mirrors the latest snapshot into a key-value store, and watches for the
//! moment a previously published TXT record disappears from the zone (the
//! signal that an external DNS-01 validation has consumed it).
//!
//! This crate holds everything that is independent of a concrete provider
//! or store:
//! - **Record model**: [`Record`], [`RecordSet`], [`RecordType`]
//! - **RecordSource**: trait for fetching records from a provider API
//! - **SnapshotStore**: trait for persisting the last-seen snapshot and the
//!   validation-complete flag
//! - **WatchEngine**: the fetch → reconcile → sleep loop
//!
//! Provider and store implementations live in their own crates
//! (`zonewatch-provider-namecheap`, `zonewatch-store-redis`) so that the
//! engine can be exercised against test doubles.

pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod store;
pub mod traits;

pub use config::{Credentials, Domain, StoreConfig, WatchConfig};
pub use engine::{EngineEvent, WatchEngine};
pub use error::{Error, Result};
pub use record::{Record, RecordSet, RecordType};
pub use store::MemorySnapshotStore;
pub use traits::{RecordSource, SnapshotStore, WriteOutcome};
