pub mod routes;
pub mod service;
pub mod ws;

use crate::state::AppState;
use std::sync::Arc;

/// Full HTTP surface: JSON API, WebSocket, and the static dashboard as fallback.
pub fn router(state: Arc<AppState>) -> axum::Router {
    let dashboard = state.config.dashboard_dir.clone();

    axum::Router::new()
        .route("/api/quote", axum::routing::get(routes::get_quote))
        .route("/api/evaluate", axum::routing::get(routes::get_evaluate))
        .route("/api/curve", axum::routing::get(routes::get_curve))
        .route("/api/defaults", axum::routing::get(routes::get_defaults))
        .route("/api/counters", axum::routing::get(routes::get_counters))
        .route("/ws", axum::routing::get(ws::ws_handler))
        .fallback_service(
            tower_http::services::ServeDir::new(&dashboard)
                .fallback(tower_http::services::ServeFile::new(dashboard.join("index.html"))),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}
