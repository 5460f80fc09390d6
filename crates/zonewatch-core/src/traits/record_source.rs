//! Record source trait
//!
//! A record source talks to one provider's record-listing endpoint and
//! returns a typed snapshot. Sources are stateless and single-shot: one
//! API call per invocation, no retries, no caching. Scheduling and
//! failure policy are owned by the [`WatchEngine`](crate::WatchEngine).

use async_trait::async_trait;

use crate::error::Error;
use crate::record::{RecordSet, RecordType};

/// Trait for provider record-listing implementations.
///
/// # Contract
///
/// - A successful call returns every host record of the configured domain,
///   in provider document order, narrowed to `filter` when one is given.
/// - An empty [`RecordSet`] means the zone genuinely has no matching
///   records; a failed fetch must surface as an error instead, so callers
///   can tell "zero records" from "provider unreachable".
/// - Implementations must be `Send + Sync` so the engine can hold them
///   across await points.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the domain's host records, optionally narrowed to one type.
    async fn fetch_records(&self, filter: Option<RecordType>) -> Result<RecordSet, Error>;

    /// A short name for this source, used in logs.
    fn source_name(&self) -> &'static str;
}
