//! Per-dashboard cycle state.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Where a dashboard is in its fetch-parse-render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    Idle,
    Fetching,
    Rendering,
    Failed,
    /// Terminal: the dashboard was torn down
    Stopped,
}

/// Shared, observable cycle state. Once `Stopped`, it never changes again.
///
/// Also tracks whether a fetch is outstanding, so at most one runs at a time
/// and a finished render settles on `Fetching` rather than `Idle` while the
/// next fetch is already in flight.
#[derive(Debug, Clone)]
pub struct StateCell {
    state: Arc<watch::Sender<CycleState>>,
    in_flight: Arc<AtomicBool>,
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCell {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CycleState::Idle);
        Self {
            state: Arc::new(state),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn get(&self) -> CycleState {
        *self.state.borrow()
    }

    /// Move to `next`, returning false if the cycle is already stopped.
    pub fn transition(&self, next: CycleState) -> bool {
        self.transition_with(|| next)
    }

    /// Return to `Idle`, or to `Fetching` if a fetch is outstanding.
    pub fn settle(&self) -> bool {
        let in_flight = &self.in_flight;
        self.transition_with(|| {
            if in_flight.load(Ordering::Acquire) {
                CycleState::Fetching
            } else {
                CycleState::Idle
            }
        })
    }

    /// Claim the single fetch slot. Returns `None` while another fetch holds it.
    pub fn begin_fetch(&self) -> Option<FetchGuard> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return None;
        }
        self.transition(CycleState::Fetching);
        Some(FetchGuard(self.in_flight.clone()))
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> watch::Receiver<CycleState> {
        self.state.subscribe()
    }

    // `next` runs under the channel lock, so it sees a consistent in-flight flag.
    fn transition_with(&self, next: impl FnOnce() -> CycleState) -> bool {
        let mut moved = false;
        self.state.send_if_modified(|state| {
            if *state == CycleState::Stopped {
                return false;
            }
            moved = true;
            let next = next();
            let changed = *state != next;
            *state = next;
            changed
        });
        moved
    }
}

/// Holds the fetch slot; releases it on drop, however the fetch ends.
#[derive(Debug)]
pub struct FetchGuard(Arc<AtomicBool>);

impl Drop for FetchGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
