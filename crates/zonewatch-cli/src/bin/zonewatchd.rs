//! Polling service.
//!
//! Every polling interval, fetches the domain's TXT records, mirrors them
//! into the Redis cache, and sets the validation-complete flag once a
//! previously cached record disappears from the zone. Runs until SIGINT or
//! SIGTERM.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use zonewatch_cli::{init_tracing, source_from_env, store_from_env};
use zonewatch_core::{Domain, WatchConfig, WatchEngine};

/// Watches a domain's TXT records for DNS-01 validation completion
#[derive(Debug, Parser)]
#[command(name = "zonewatchd", version)]
struct Args {
    /// The domain to watch, as SLD.TLD
    #[arg(short = 'd', long)]
    domain: String,

    /// Enable debug logging
    #[arg(short = 'v', long = "debug")]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("service failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let domain: Domain = args.domain.parse().context("invalid --domain argument")?;
    info!(%domain, "starting zonewatchd");

    let source = source_from_env(domain.clone())?;
    let store = store_from_env()?;
    let config = WatchConfig::new(domain);

    let (engine, mut events) = WatchEngine::new(Box::new(source), Box::new(store), config)?;

    // Engine events are already logged at the point of origin; the drain
    // here keeps the channel from filling and gives one place to hook
    // external notification later.
    let observer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(?event, "engine event");
        }
    });

    let shutdown = shutdown_signal();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        shutdown.await;
        let _ = shutdown_tx.send(());
    });

    let result = engine.run_with_shutdown(shutdown_rx).await;
    observer.abort();
    info!("zonewatchd stopped");
    result.map_err(Into::into)
}

/// Resolve when SIGINT or SIGTERM arrives.
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            error!(error = %e, "failed to install SIGTERM handler");
            // Fall back to SIGINT only.
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
        _ = sigterm.recv() => info!("received SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received interrupt");
}
