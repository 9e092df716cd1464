//! # server_info - Server Status Dashboard
//!
//! Polls the `system_info.json` document published by a Linux host and renders
//! it as a small dashboard of text fields and themed icons, either in the
//! terminal or as a live web page.
//!
//! ## Features
//!
//! - **Periodic polling**: HTTP endpoint or local file, one fetch in flight at a time
//! - **Tolerant parsing**: every field is optional, a bad field only skips its slot
//! - **Icon mapping**: distribution and CPU vendor icons from ordered substring rules
//! - **Stale-on-failure rendering**: failed ticks leave the previous display untouched
//! - **Web dashboard**: HTML page, JSON API and WebSocket push via axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use server_info::{ApiAddress, Dashboard, DashboardConfig, EndpointFetcher, TerminalPrinter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DashboardConfig::default();
//!     let address = ApiAddress::new(config.endpoint.clone());
//!     let source = Arc::new(EndpointFetcher::new()?);
//!
//!     let handle = Dashboard::new(config, source, address)
//!         .with_observer(TerminalPrinter::stdout())
//!         .start()?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     handle.stop();
//!     handle.join().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
pub mod poller;
pub mod presentation;
pub mod render;
pub mod snapshot;
pub mod web;

// Re-export public API
pub use config::{ApiAddress, DashboardConfig, Settings};
pub use dashboard::{Dashboard, DashboardHandle};
pub use error::{DashboardError, Result};
pub use poller::{
    CycleState, Endpoint, EndpointFetcher, Poller, RepeatingTask, Schedule, SnapshotSource,
    TaskHandle, TickMessage,
};
pub use presentation::{CpuIcon, DistributionIcon, Icon};
pub use render::{Board, BoardObserver, Renderer, Slot, SlotUpdate, SlotValue, TerminalPrinter};
pub use snapshot::{parse_snapshot, SystemSnapshot};
pub use web::{start_web_server, BoardPublisher, WebConfig};

/// The default polling interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// The default delay before the first terminal fetch in milliseconds
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

/// The default per-fetch timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5000;

/// The default polled endpoint
pub const DEFAULT_ENDPOINT: &str = "http://10.0.1.1:9000/system_info.json";

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 8080;
