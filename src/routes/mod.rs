//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The relay exposes one websocket endpoint at `/` and a liveness check.
//! A plain `GET /` without upgrade headers answers with a short status line
//! so load balancers and curious browsers get something readable.

pub mod ws;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check; the body carries the current peer count.
async fn healthz(State(state): State<AppState>) -> (StatusCode, String) {
    (StatusCode::OK, format!("ok clients={}", state.client_count().await))
}
