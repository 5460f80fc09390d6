//! One-shot query tool.
//!
//! Fetches a domain's host records from Namecheap, optionally narrowed to
//! one type, and optionally pushes the result into the Redis cache.
//!
//! Exit codes: 1 for missing environment configuration, an invalid record
//! type, or a failed cache write; 0 otherwise. "No records found" is a
//! warning, not an error.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use zonewatch_cli::{init_tracing, parse_filter, source_from_env, store_from_env};
use zonewatch_core::{Domain, RecordSet, RecordSource, SnapshotStore};

/// A utility for querying Namecheap host records
#[derive(Debug, Parser)]
#[command(name = "zonewatch", version)]
struct Args {
    /// The domain to query, as SLD.TLD
    #[arg(short = 'd', long)]
    domain: String,

    /// Record type to query for (A, AAAA, CNAME, MX, TXT); all types if unset
    #[arg(short = 't', long = "record_type")]
    record_type: Option<String>,

    /// Store the query result in Redis (connection settings from the environment)
    #[arg(short = 'r', long = "use_redis")]
    use_redis: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(false);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("query failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let filter = parse_filter(args.record_type.as_deref())?;

    let domain: Domain = args.domain.parse().context("invalid --domain argument")?;
    let source = source_from_env(domain.clone())?;

    info!(%domain, "querying Namecheap");

    let (records, fetch_failed) = match source.fetch_records(filter).await {
        Ok(records) => (records, false),
        Err(e) if e.is_recoverable() => {
            // The caller can still distinguish this from "zero records" in
            // the logs; as an exit status it is a warning, not a failure.
            warn!(error = %e, "fetch failed");
            (RecordSet::new(), true)
        }
        Err(e) => return Err(e.into()),
    };

    if records.is_empty() {
        match filter {
            Some(rt) => warn!(record_type = %rt, "no records of the requested type were found"),
            None => warn!("no records were found"),
        }
    } else {
        for record in &records {
            info!(name = %record.name, value = %record.value, record_type = %record.record_type,
                  "found record");
        }
    }

    // A failed fetch must not clobber the cached snapshot with an empty
    // set; the watcher would read that as a removed record.
    if args.use_redis && !fetch_failed {
        let store = store_from_env()?;
        store
            .write(&records)
            .await
            .context("unable to send records to Redis")?;
        info!("sent records to Redis");
    }

    info!("execution complete");
    Ok(())
}
