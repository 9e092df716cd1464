//! HTTP handlers for the dashboard page and API endpoints.

use crate::config::Settings;
use crate::error::DashboardError;
use crate::poller::{CycleState, Endpoint};
use crate::render::Board;
use crate::web::page::render_page;
use crate::web::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

/// Current board, cycle state and polled endpoint.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub endpoint: String,
    pub state: CycleState,
    pub board: Board,
}

/// Serve the dashboard page rendered from the latest board.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let board = state.board.borrow().clone();
    let endpoint = state.address.current().to_string();
    Html(render_page(
        &state.config.title,
        &board,
        &endpoint,
        state.config.static_path.is_some(),
    ))
}

/// Get the latest board as JSON.
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        endpoint: state.address.current().to_string(),
        state: *state.cycle.borrow(),
        board: state.board.borrow().clone(),
    })
}

/// Get the polled API address.
pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(Settings {
        api_address: state.address.current().to_string(),
    })
}

/// Change the polled API address; takes effect on the next tick.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Response {
    let endpoint: Endpoint = match settings.api_address.parse() {
        Ok(endpoint) => endpoint,
        Err(e) => {
            warn!("Rejected API address {:?}: {}", settings.api_address, e);
            return error_response(StatusCode::BAD_REQUEST, &e);
        }
    };

    match state.address.set(endpoint).await {
        Ok(()) => Json(Settings {
            api_address: state.address.current().to_string(),
        })
        .into_response(),
        Err(e) => {
            error!("Failed to store API address: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "server_info",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

fn error_response(status: StatusCode, err: &DashboardError) -> Response {
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
