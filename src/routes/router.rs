use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{handle_walk, health};
use crate::state::AppState;
use crate::ws::ws_handler;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "printwatch" }))
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .route("/walk", post(handle_walk))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
