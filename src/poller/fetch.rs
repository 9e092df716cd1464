//! The fetch stage: one background fetch per tick, delivered as a message.

use crate::config::{ApiAddress, DashboardConfig};
use crate::error::{DashboardError, Result};
use crate::poller::scheduler::{RepeatingTask, Schedule, TaskHandle};
use crate::poller::source::{Endpoint, SnapshotSource};
use crate::poller::state::StateCell;
use crate::snapshot::{parse_snapshot, SystemSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The outcome of one tick, handed to the render stage.
#[derive(Debug)]
pub struct TickMessage {
    /// 1-based tick number
    pub tick: u64,
    /// Endpoint this tick polled
    pub endpoint: Endpoint,
    /// Parsed snapshot, or why the tick produced none
    pub outcome: Result<SystemSnapshot>,
}

/// Fetch and parse one snapshot, bounded by `timeout`.
pub async fn fetch_snapshot(
    source: &dyn SnapshotSource,
    endpoint: &Endpoint,
    timeout: Duration,
) -> Result<SystemSnapshot> {
    let raw = time::timeout(timeout, source.fetch(endpoint))
        .await
        .map_err(|_| DashboardError::Timeout(timeout))??;
    parse_snapshot(&raw)
}

/// Periodically fetches snapshots off the render task.
///
/// At most one fetch is in flight: a tick that fires while the previous
/// fetch is outstanding is skipped.
pub struct Poller {
    source: Arc<dyn SnapshotSource>,
    address: ApiAddress,
    schedule: Schedule,
    timeout: Duration,
    state: StateCell,
}

impl Poller {
    pub fn new(source: Arc<dyn SnapshotSource>, address: ApiAddress, config: &DashboardConfig) -> Self {
        Self {
            source,
            address,
            schedule: config.schedule(),
            timeout: config.fetch_timeout(),
            state: StateCell::new(),
        }
    }

    /// Report cycle transitions into `state`.
    pub fn with_state(mut self, state: StateCell) -> Self {
        self.state = state;
        self
    }

    /// Start ticking. Results go to `results` until `token` is cancelled;
    /// anything completing after cancellation is dropped.
    pub fn spawn(self, token: CancellationToken, results: mpsc::Sender<TickMessage>) -> TaskHandle {
        let Poller {
            source,
            address,
            schedule,
            timeout,
            state,
        } = self;
        let cancelled = token.clone();

        RepeatingTask::start(schedule, token, move |tick| {
            let source = source.clone();
            let results = results.clone();
            let state = state.clone();
            let cancelled = cancelled.clone();
            let endpoint = address.current();

            async move {
                let Some(guard) = state.begin_fetch() else {
                    debug!(tick, "Previous fetch still in flight, skipping tick");
                    return;
                };

                tokio::spawn(async move {
                    let outcome = fetch_snapshot(source.as_ref(), &endpoint, timeout).await;
                    drop(guard);
                    let message = TickMessage {
                        tick,
                        endpoint,
                        outcome,
                    };

                    tokio::select! {
                        biased;
                        _ = cancelled.cancelled() => {
                            debug!(tick, "Poller stopped, discarding fetch result");
                        }
                        sent = results.send(message) => {
                            if sent.is_err() {
                                debug!(tick, "Render stage gone, discarding fetch result");
                            }
                        }
                    }
                });
            }
        })
    }
}
