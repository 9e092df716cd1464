//! Router assembly for the web dashboard.

use crate::web::{handlers, websocket, AppState};
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

/// Build the axum application.
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .route("/", get(handlers::index))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route(
            "/api/settings",
            get(handlers::get_settings).post(handlers::update_settings),
        )
        .route("/health", get(handlers::health_check))
        .route("/ws", get(websocket::websocket_handler));

    if let Some(static_path) = &config.static_path {
        info!("Serving static files from {}", static_path);
        app = app.nest_service("/static", ServeDir::new(static_path));
    }

    let app = app.layer(TraceLayer::new_for_http()).with_state(state);

    if config.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
