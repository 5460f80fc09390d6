//! # Redis snapshot store
//!
//! [`SnapshotStore`] implementation over Redis. Two keys in logical
//! database 4 make up the whole contract:
//!
//! - `dns_update` — the JSON-serialized [`RecordSet`] snapshot
//! - `validation_complete` — the validation marker, set to `1` and never
//!   cleared
//!
//! Writes compare against the cached snapshot first and skip the `SET`
//! when the content is structurally identical. The read-then-write pair is
//! not atomic; the system assumes a single writer per domain.
//!
//! Connectivity and serialization failures surface as
//! [`Error::Store`](zonewatch_core::Error::Store); the caller decides
//! whether that is fatal.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

use zonewatch_core::{Error, RecordSet, SnapshotStore, StoreConfig, WriteOutcome};

/// Key holding the serialized record snapshot
pub const SNAPSHOT_KEY: &str = "dns_update";

/// Key holding the validation-complete marker
pub const VALIDATION_KEY: &str = "validation_complete";

/// Logical database index shared with the validation workflow
pub const DATABASE_INDEX: u8 = 4;

/// Snapshot store backed by a Redis instance.
#[derive(Debug, Clone)]
pub struct RedisSnapshotStore {
    client: redis::Client,
}

impl RedisSnapshotStore {
    /// Create a store for the given connection settings.
    ///
    /// No connection is made here; each operation opens (or reuses) a
    /// multiplexed connection and maps failures to store errors.
    pub fn new(config: &StoreConfig) -> Result<Self, Error> {
        let url = connection_url(config);
        let client = redis::Client::open(url).map_err(store_error)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, Error> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(store_error)
    }

    /// Fetch and deserialize the cached snapshot.
    ///
    /// A value that fails to deserialize is reported as absent so a
    /// corrupt cache entry heals on the next write instead of wedging the
    /// loop.
    async fn read_snapshot(&self) -> Result<Option<RecordSet>, Error> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(SNAPSHOT_KEY).await.map_err(store_error)?;

        match raw {
            None => Ok(None),
            Some(json) => match serde_json::from_str(&json) {
                Ok(snapshot) => Ok(Some(snapshot)),
                Err(e) => {
                    warn!(key = SNAPSHOT_KEY, error = %e, "cached snapshot is not valid JSON, treating as absent");
                    Ok(None)
                }
            },
        }
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    async fn read(&self) -> Result<Option<RecordSet>, Error> {
        self.read_snapshot().await
    }

    async fn write(&self, snapshot: &RecordSet) -> Result<WriteOutcome, Error> {
        if let Some(cached) = self.read_snapshot().await? {
            if cached.matches(snapshot) {
                debug!(key = SNAPSHOT_KEY, "snapshot already cached");
                return Ok(WriteOutcome::Unchanged);
            }
            debug!(key = SNAPSHOT_KEY, "cached snapshot differs from fetched records");
        }

        let json = serde_json::to_string(snapshot)?;
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(SNAPSHOT_KEY, json)
            .await
            .map_err(store_error)?;

        Ok(WriteOutcome::Updated)
    }

    async fn mark_validation_complete(&self) -> Result<(), Error> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(VALIDATION_KEY, 1)
            .await
            .map_err(store_error)
    }

    async fn validation_complete(&self) -> Result<bool, Error> {
        let mut conn = self.connection().await?;
        let flag: Option<String> = conn.get(VALIDATION_KEY).await.map_err(store_error)?;
        Ok(flag.is_some())
    }
}

fn connection_url(config: &StoreConfig) -> String {
    format!("redis://{}:{}/{}", config.host, config.port, DATABASE_INDEX)
}

fn store_error(e: redis::RedisError) -> Error {
    Error::store(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_url_targets_the_fixed_database() {
        let config = StoreConfig {
            host: "cache.internal".into(),
            port: 6380,
        };
        assert_eq!(connection_url(&config), "redis://cache.internal:6380/4");
    }

    #[test]
    fn defaults_produce_local_url() {
        assert_eq!(
            connection_url(&StoreConfig::default()),
            "redis://127.0.0.1:6379/4"
        );
    }

    #[test]
    fn client_builds_from_default_config() {
        assert!(RedisSnapshotStore::new(&StoreConfig::default()).is_ok());
    }
}
