//! The fetch-parse-render cycle.
//!
//! A [`Poller`] produces one [`TickMessage`] per tick on background tasks.
//! A single render task owns the [`Board`], applies each message to it and
//! notifies observers. Nothing but the render task ever touches the board.

use crate::config::{ApiAddress, DashboardConfig};
use crate::error::Result;
use crate::poller::{CycleState, Poller, SnapshotSource, StateCell, TaskHandle, TickMessage};
use crate::render::{Board, BoardObserver, Renderer};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Source of "now" for uptime computation.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

const RESULT_QUEUE_DEPTH: usize = 4;

/// A configured, not yet running dashboard.
pub struct Dashboard {
    config: DashboardConfig,
    source: Arc<dyn SnapshotSource>,
    address: ApiAddress,
    observers: Vec<Box<dyn BoardObserver>>,
    clock: Clock,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, source: Arc<dyn SnapshotSource>, address: ApiAddress) -> Self {
        Self {
            config,
            source,
            address,
            observers: Vec::new(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Notify `observer` after every render that changed the board.
    pub fn with_observer(mut self, observer: impl BoardObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Use a custom clock instead of the system time.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Start the poller and the render task.
    pub fn start(self) -> Result<DashboardHandle> {
        self.config.validate()?;

        let token = CancellationToken::new();
        let state = StateCell::new();
        let (results_tx, results_rx) = mpsc::channel(RESULT_QUEUE_DEPTH);

        info!(
            "Polling {} every {}ms (first fetch after {}ms)",
            self.address.current(),
            self.config.interval_ms,
            self.config.initial_delay_ms
        );

        let poller = Poller::new(self.source, self.address, &self.config)
            .with_state(state.clone())
            .spawn(token.clone(), results_tx);

        let render = tokio::spawn(render_loop(
            results_rx,
            Board::new(),
            self.observers,
            token.clone(),
            state.clone(),
            self.clock,
        ));

        Ok(DashboardHandle {
            token,
            state,
            poller,
            render,
        })
    }
}

/// Handle to a running dashboard.
pub struct DashboardHandle {
    token: CancellationToken,
    state: StateCell,
    poller: TaskHandle,
    render: JoinHandle<Board>,
}

impl DashboardHandle {
    /// Tear the dashboard down: no tick starts and no render happens after
    /// this returns, even if a fetch is still in flight. A render already
    /// applying to the board when this is called does not notify observers.
    pub fn stop(&self) {
        self.token.cancel();
        self.state.transition(CycleState::Stopped);
    }

    pub fn state(&self) -> CycleState {
        self.state.get()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<CycleState> {
        self.state.subscribe()
    }

    /// Token cancelled when the dashboard stops.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for both stages to finish and return the final board.
    pub async fn join(self) -> Board {
        let ticks = self.poller.join().await;
        debug!("Poller finished after {} ticks", ticks);
        self.render.await.unwrap_or_else(|e| {
            warn!("Render task ended abnormally: {}", e);
            Board::new()
        })
    }
}

async fn render_loop(
    mut results: mpsc::Receiver<TickMessage>,
    mut board: Board,
    mut observers: Vec<Box<dyn BoardObserver>>,
    token: CancellationToken,
    state: StateCell,
    clock: Clock,
) -> Board {
    loop {
        let message = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            message = results.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        match message.outcome {
            Ok(snapshot) => {
                if !state.transition(CycleState::Rendering) {
                    break;
                }
                let changed = board.render(Some(&snapshot), clock());
                debug!(tick = message.tick, changed, "Rendered snapshot");
                if token.is_cancelled() {
                    break;
                }
                if changed > 0 {
                    for observer in observers.iter_mut() {
                        observer.board_changed(&board);
                    }
                }
            }
            Err(e) => {
                if !state.transition(CycleState::Failed) {
                    break;
                }
                warn!(
                    tick = message.tick,
                    endpoint = %message.endpoint,
                    "Tick failed, keeping previous display: {}",
                    e
                );
            }
        }
        state.settle();
    }

    state.transition(CycleState::Stopped);
    board
}
