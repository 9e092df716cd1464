//! WebSocket push of board updates to dashboard viewers.

use crate::render::Board;
use crate::web::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// WebSocket upgrade handler.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let Some(slot) = ViewerSlot::acquire(&state.viewers, state.config.max_websocket_connections) else {
        warn!(
            "Rejecting WebSocket viewer: limit of {} reached",
            state.config.max_websocket_connections
        );
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    let board = state.board.clone();
    ws.on_upgrade(move |socket| handle_viewer(socket, board, slot))
}

/// Push the current board, then every change, until either side goes away.
async fn handle_viewer(socket: WebSocket, mut board: watch::Receiver<Board>, _slot: ViewerSlot) {
    let (mut sender, mut receiver) = socket.split();
    info!("Dashboard viewer connected");

    // Send what is on screen right now, then only changes.
    board.mark_changed();

    loop {
        tokio::select! {
            changed = board.changed() => {
                if changed.is_err() {
                    debug!("Dashboard stopped, closing viewer");
                    break;
                }
                let json = match serde_json::to_string(&*board.borrow_and_update()) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Failed to serialize board: {}", e);
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(json)).await {
                    debug!("Failed to push board to viewer: {}", e);
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("WebSocket error: {}", e);
                    break;
                }
            },
        }
    }

    info!("Dashboard viewer disconnected");
}

/// One counted viewer connection, released on drop.
struct ViewerSlot(Arc<AtomicUsize>);

impl ViewerSlot {
    fn acquire(viewers: &Arc<AtomicUsize>, max: usize) -> Option<Self> {
        viewers
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < max).then_some(n + 1))
            .ok()
            .map(|_| Self(viewers.clone()))
    }
}

impl Drop for ViewerSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_limit() {
        let viewers = Arc::new(AtomicUsize::new(0));
        let first = ViewerSlot::acquire(&viewers, 2).unwrap();
        let _second = ViewerSlot::acquire(&viewers, 2).unwrap();
        assert!(ViewerSlot::acquire(&viewers, 2).is_none());

        drop(first);
        assert!(ViewerSlot::acquire(&viewers, 2).is_some());
    }
}
