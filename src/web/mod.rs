//! Web front-end for the dashboard.
//!
//! The render task publishes every changed board into a `watch` channel;
//! handlers and WebSocket viewers only ever read published copies.

pub mod config;
pub mod handlers;
pub mod page;
pub mod router;
pub mod websocket;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::config::ApiAddress;
use crate::error::{DashboardError, Result};
use crate::poller::CycleState;
use crate::render::{Board, BoardObserver};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub board: watch::Receiver<Board>,
    pub cycle: watch::Receiver<CycleState>,
    pub address: ApiAddress,
    pub config: Arc<WebConfig>,
    pub(crate) viewers: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(
        config: WebConfig,
        board: watch::Receiver<Board>,
        cycle: watch::Receiver<CycleState>,
        address: ApiAddress,
    ) -> Self {
        Self {
            board,
            cycle,
            address,
            config: Arc::new(config),
            viewers: Arc::new(AtomicUsize::new(0)),
        }
    }
}

/// Publishes every changed board to the web front-end.
pub struct BoardPublisher {
    tx: watch::Sender<Board>,
}

impl BoardPublisher {
    /// Create a publisher and the receiver the web state reads from.
    pub fn channel() -> (Self, watch::Receiver<Board>) {
        let (tx, rx) = watch::channel(Board::new());
        (Self { tx }, rx)
    }
}

impl BoardObserver for BoardPublisher {
    fn board_changed(&mut self, board: &Board) {
        self.tx.send_replace(board.clone());
    }
}

/// Serve the dashboard until `shutdown` is cancelled.
pub async fn start_web_server(
    config: WebConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = config.bind().await?;
    let addr = listener.local_addr()?;
    let app = create_app(state);

    info!("Dashboard available at http://{}/", addr);
    info!("API endpoint: http://{}/api/dashboard", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| DashboardError::web_server_error(format!("Server error: {}", e)))?;

    info!("Web server stopped");
    Ok(())
}
