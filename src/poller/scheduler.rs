//! A cancellable repeating task.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// When a repeating task fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Delay before the first tick; zero fires immediately
    pub initial_delay: Duration,
    /// Time between ticks
    pub interval: Duration,
}

impl Schedule {
    pub fn every(interval: Duration) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            interval,
        }
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }
}

/// Handle to a running [`RepeatingTask`].
#[derive(Debug)]
pub struct TaskHandle {
    token: CancellationToken,
    join: JoinHandle<u64>,
}

impl TaskHandle {
    /// Stop the task. No tick starts after this returns.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the task to finish, returning how many ticks ran.
    pub async fn join(self) -> u64 {
        self.join.await.unwrap_or_else(|e| {
            debug!("Repeating task ended abnormally: {}", e);
            0
        })
    }
}

/// Runs an action on a fixed interval until cancelled.
pub struct RepeatingTask;

impl RepeatingTask {
    /// Start calling `action` with a 1-based tick number on `schedule`.
    ///
    /// The task stops when `token` (or the returned handle) is cancelled. An
    /// action that is still running when a tick is due delays that tick
    /// rather than piling ticks up.
    pub fn start<F, Fut>(schedule: Schedule, token: CancellationToken, mut action: F) -> TaskHandle
    where
        F: FnMut(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = schedule.interval.max(Duration::from_millis(1));
        let cancelled = token.clone();

        let join = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + schedule.initial_delay, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut ticks = 0;
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                ticks += 1;
                action(ticks).await;
            }
            debug!("Repeating task stopped after {} ticks", ticks);
            ticks
        });

        TaskHandle { token, join }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_is_immediate_without_delay() {
        let count = Arc::new(AtomicU64::new(0));
        let seen = count.clone();
        let handle = RepeatingTask::start(
            Schedule::every(Duration::from_secs(1)),
            CancellationToken::new(),
            move |_| {
                let seen = seen.clone();
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        handle.cancel();
        assert_eq!(handle.join().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_delay() {
        let count = Arc::new(AtomicU64::new(0));
        let seen = count.clone();
        let schedule = Schedule::every(Duration::from_secs(1)).with_initial_delay(Duration::from_secs(1));
        let handle = RepeatingTask::start(schedule, CancellationToken::new(), move |_| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        handle.cancel();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_further_ticks() {
        let count = Arc::new(AtomicU64::new(0));
        let seen = count.clone();
        let token = CancellationToken::new();
        let handle = RepeatingTask::start(Schedule::every(Duration::from_millis(100)), token.clone(), move |_| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        time::sleep(Duration::from_millis(250)).await;
        token.cancel();
        let ticks = handle.join().await;

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), ticks);
    }
}
