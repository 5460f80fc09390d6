//! Shared glue for the zonewatch binaries.
//!
//! Both tools load the same environment configuration and the same logging
//! setup; only their argument surfaces and run loops differ. Errors cross
//! into `anyhow` here, at the binary edge; the library crates keep the
//! typed [`zonewatch_core::Error`].

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use zonewatch_core::{Credentials, Domain, RecordType, StoreConfig};
use zonewatch_provider_namecheap::NamecheapDns;
use zonewatch_store_redis::RedisSnapshotStore;

/// Initialize the global tracing subscriber.
///
/// `debug` raises the maximum level from INFO to DEBUG.
pub fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    // A second init (tests, embedding) is not a reason to abort.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Parse an optional `--record_type` argument.
///
/// An unsupported type is a usage error and must fail before any network
/// or store traffic.
pub fn parse_filter(raw: Option<&str>) -> Result<Option<RecordType>> {
    raw.map(str::parse::<RecordType>)
        .transpose()
        .context("unsupported --record_type value")
}

/// Build a Namecheap source for `domain` from the process environment.
pub fn source_from_env(domain: Domain) -> Result<NamecheapDns> {
    let credentials =
        Credentials::from_env().context("provider credentials not configured")?;
    NamecheapDns::new(credentials, domain).context("failed to build Namecheap client")
}

/// Build the Redis store from the process environment.
pub fn store_from_env() -> Result<RedisSnapshotStore> {
    let config = StoreConfig::from_env().context("store settings not configured")?;
    RedisSnapshotStore::new(&config).context("failed to initialize Redis store")
}
