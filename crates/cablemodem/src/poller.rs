//! Fixed-interval polling of a single modem.
//!
//! The poller is the only stateful piece of the crate. It keeps the last
//! successful snapshot around for display between polls and tracks whether
//! the most recent poll succeeded. One poller serves one modem; nothing is
//! shared between instances.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::TransportError;
use crate::modem::StatusSource;
use crate::status::Snapshot;

/// Poll interval used by the reference deployment.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// What consumers see of the poller between cycles.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// Last successfully parsed snapshot. Kept after a failed poll.
    pub snapshot: Option<Arc<Snapshot>>,
    /// Whether the most recent poll succeeded.
    pub available: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    /// Completed poll cycles, successful or not.
    pub polls: u64,
}

impl PollState {
    /// The snapshot to display, or `None` while the modem is unavailable.
    pub fn current(&self) -> Option<&Snapshot> {
        if self.available {
            self.snapshot.as_deref()
        } else {
            None
        }
    }
}

pub struct StatusPoller<S> {
    source: S,
    interval: Duration,
    state: watch::Sender<PollState>,
}

impl<S: StatusSource> StatusPoller<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        let (state, _) = watch::channel(PollState::default());
        Self {
            source,
            interval,
            state,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receiver notified after every completed poll cycle.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Runs one fetch and parse cycle and records its outcome.
    pub async fn poll_once(&self) -> Result<Arc<Snapshot>, TransportError> {
        let host = self.source.host();

        match self.source.get_status().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.state.send_modify(|state| {
                    if state.consecutive_failures > 0 {
                        info!(
                            host,
                            failures = state.consecutive_failures,
                            "Modem reachable again"
                        );
                    }
                    state.snapshot = Some(snapshot.clone());
                    state.available = true;
                    state.last_success = Some(Utc::now());
                    state.last_error = None;
                    state.consecutive_failures = 0;
                    state.polls += 1;
                });
                Ok(snapshot)
            }
            Err(e) => {
                error!(host, error = %e, "Error communicating with modem");
                self.state.send_modify(|state| {
                    state.available = false;
                    state.last_error = Some(e.to_string());
                    state.consecutive_failures += 1;
                    state.polls += 1;
                });
                Err(e)
            }
        }
    }

    /// Polls immediately and then once per interval until `cancel` fires.
    ///
    /// A cycle always runs to completion; cancellation is only observed
    /// between cycles. Ticks missed while a slow cycle runs are skipped.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!(host = self.source.host(), interval = ?self.interval, "Starting modem poller");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            // failures are recorded in the poll state
            let _ = self.poll_once().await;
        }
        debug!(host = self.source.host(), "Modem poller stopped");
    }
}
