//! Periodic fetching of system snapshots.
//!
//! This module provides the fetch stage of the dashboard: a cancellable
//! repeating timer, the sources a snapshot can be read from, and the poller
//! that runs one background fetch per tick and hands the result over a
//! channel to the render stage.

pub mod fetch;
pub mod scheduler;
pub mod source;
pub mod state;

// Re-export commonly used items
pub use fetch::{fetch_snapshot, Poller, TickMessage};
pub use scheduler::{RepeatingTask, Schedule, TaskHandle};
pub use source::{Endpoint, EndpointFetcher, SnapshotSource};
pub use state::{CycleState, FetchGuard, StateCell};
