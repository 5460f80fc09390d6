//! Watch engine
//!
//! The engine drives the reconciliation loop for one domain's TXT records:
//!
//! ```text
//! ┌──────────┐   fetch TXT    ┌──────────────┐   read/write   ┌───────────────┐
//! │ Record   │ ─────────────▶ │ WatchEngine  │ ─────────────▶ │ SnapshotStore │
//! │ Source   │                │ (reconcile)  │                └───────────────┘
//! └──────────┘                └──────┬───────┘
//!                                    │ sleep(poll_interval)
//!                                    ▼
//!                                 next cycle
//! ```
//!
//! Per cycle:
//! 1. Fetch the domain's TXT records. Fetch failures are logged and the
//!    cycle ends; the loop never crashes on a provider hiccup.
//! 2. Reconcile against the cached snapshot:
//!    - snapshot cached and fresh fetch empty → the published TXT record
//!      was removed upstream; set the validation-complete flag.
//!    - fresh fetch non-empty → conditional write (the store reports
//!      whether anything changed).
//! 3. Sleep until the next cycle. The sleep is cancellable through an
//!    explicit shutdown signal or SIGINT.
//!
//! Store errors inside a cycle are logged and the loop continues; a store
//! hiccup must not kill an indefinitely running service.

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::WatchConfig;
use crate::error::Result;
use crate::record::RecordType;
use crate::traits::{RecordSource, SnapshotStore, WriteOutcome};

/// Events emitted by the engine for external observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine started polling
    Started {
        /// Domain being watched
        domain: String,
    },

    /// A fetch attempt failed; the cycle was skipped
    FetchFailed {
        /// Rendered error
        error: String,
    },

    /// A fresh snapshot differed from the cache and was persisted
    SnapshotUpdated {
        /// Number of records in the new snapshot
        records: usize,
    },

    /// The fresh snapshot was already cached; nothing written
    SnapshotUnchanged {
        /// Number of records in the snapshot
        records: usize,
    },

    /// A previously cached TXT record disappeared from the zone
    ValidationComplete,

    /// A store operation failed; the loop continues
    StoreUnavailable {
        /// Rendered error
        error: String,
    },

    /// The engine stopped
    Stopped {
        /// Why the loop ended
        reason: String,
    },
}

/// The reconciliation loop over one [`RecordSource`] and one
/// [`SnapshotStore`].
///
/// Single-threaded and cooperative: one logical task runs
/// fetch → reconcile → sleep in sequence. No concurrent fetches or writes
/// are ever issued.
pub struct WatchEngine {
    source: Box<dyn RecordSource>,
    store: Box<dyn SnapshotStore>,
    config: WatchConfig,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl WatchEngine {
    /// Create a new engine.
    ///
    /// Returns the engine and a receiver for [`EngineEvent`]s. The receiver
    /// may be dropped if the caller is not interested; events are then
    /// discarded.
    pub fn new(
        source: Box<dyn RecordSource>,
        store: Box<dyn SnapshotStore>,
        config: WatchConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let engine = Self {
            source,
            store,
            config,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run the loop until SIGINT.
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the loop until the provided shutdown signal fires.
    ///
    /// Tests use this to run a bounded, deterministic number of cycles;
    /// daemons that manage their own signals can use it too.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: tokio::sync::oneshot::Receiver<()>,
    ) -> Result<()> {
        self.run_internal(Some(shutdown_rx)).await
    }

    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.emit_event(EngineEvent::Started {
            domain: self.config.domain.to_string(),
        });
        info!(domain = %self.config.domain, interval_secs = self.config.poll_interval_secs,
              "watching TXT records");

        if let Some(mut rx) = shutdown_rx {
            loop {
                self.poll_cycle().await;

                tokio::select! {
                    _ = tokio::time::sleep(self.config.poll_interval()) => {}
                    _ = &mut rx => {
                        info!("shutdown signal received");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        } else {
            loop {
                self.poll_cycle().await;

                tokio::select! {
                    _ = tokio::time::sleep(self.config.poll_interval()) => {}
                    _ = tokio::signal::ctrl_c() => {
                        info!("interrupt received");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "interrupt".to_string(),
                        });
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// One full fetch → reconcile pass, with the loop's failure policy
    /// applied: nothing here is fatal.
    async fn poll_cycle(&self) {
        if let Err(e) = self.run_once().await {
            // run_once only lets store errors through
            error!(error = %e, "store unavailable, will retry next cycle");
            self.emit_event(EngineEvent::StoreUnavailable {
                error: e.to_string(),
            });
        }
    }

    /// Execute a single polling cycle.
    ///
    /// Fetch failures are handled inside (logged, event emitted, `Ok`);
    /// store failures are returned so the caller picks the policy. Tests
    /// call this directly to run a bounded number of cycles.
    pub async fn run_once(&self) -> Result<()> {
        let fresh = match self.source.fetch_records(Some(RecordType::Txt)).await {
            Ok(set) => set,
            Err(e) => {
                warn!(source = self.source.source_name(), error = %e, "fetch failed, skipping cycle");
                self.emit_event(EngineEvent::FetchFailed {
                    error: e.to_string(),
                });
                return Ok(());
            }
        };

        let cached = self.store.read().await?;

        match cached {
            Some(snapshot) if fresh.is_empty() => {
                // The provider deleted the challenge record once validation
                // finished upstream.
                info!(
                    cached_records = snapshot.len(),
                    "cached TXT record no longer in zone, validation has completed"
                );
                self.store.mark_validation_complete().await?;
                self.emit_event(EngineEvent::ValidationComplete);
            }
            _ if !fresh.is_empty() => match self.store.write(&fresh).await? {
                WriteOutcome::Updated => {
                    info!(records = fresh.len(), "persisted new TXT snapshot");
                    self.emit_event(EngineEvent::SnapshotUpdated {
                        records: fresh.len(),
                    });
                }
                WriteOutcome::Unchanged => {
                    debug!(records = fresh.len(), "snapshot unchanged");
                    self.emit_event(EngineEvent::SnapshotUnchanged {
                        records: fresh.len(),
                    });
                }
            },
            _ => {
                debug!("no snapshot cached and zone has no TXT records");
            }
        }

        Ok(())
    }

    fn emit_event(&self, event: EngineEvent) {
        // Observers are optional; a full or closed channel just drops the
        // event.
        if let Err(e) = self.event_tx.try_send(event) {
            if matches!(e, mpsc::error::TrySendError::Full(_)) {
                warn!("event channel full, dropping event");
            }
        }
    }
}

impl std::fmt::Debug for WatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchEngine")
            .field("source", &self.source.source_name())
            .field("domain", &self.config.domain.to_string())
            .field("poll_interval_secs", &self.config.poll_interval_secs)
            .finish()
    }
}
