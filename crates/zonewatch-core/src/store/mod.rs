//! Snapshot store implementations bundled with the core crate.
//!
//! The persistent Redis store lives in its own crate
//! (`zonewatch-store-redis`); this module only carries the in-memory store
//! used by tests and embedded callers.

pub mod memory;

pub use memory::MemorySnapshotStore;
