//! WebSocket relay handler.
//!
//! DESIGN
//! ======
//! Each connection gets a fresh id and a bounded outbound queue registered in
//! `AppState`. Inbound text frames are validated as JSON and fanned out to
//! every other peer; everything else the peer sends is ignored.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade, mint client id, register outbound queue.
//! 2. `select!` loop: inbound socket frames vs. queued peer frames.
//! 3. On close or socket error, unregister and log the remaining count.
//!
//! ERROR HANDLING
//! ==============
//! A malformed frame is logged and dropped; the sender stays connected.
//! A failed outbound write ends the connection.

use axum::extract::State;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::relay;
use crate::state::AppState;

pub const STATUS_TEXT: &str = "WebSocket server is running";

pub async fn handle_ws(
    State(state): State<AppState>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| run_ws(socket, state)),
        Err(_) => STATUS_TEXT.into_response(),
    }
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection queue for frames relayed from peers.
    let (client_tx, mut client_rx) = mpsc::channel::<Utf8Bytes>(state.client_buffer);
    let clients = relay::join(&state, client_id, client_tx).await;
    info!(%client_id, clients, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        debug!(%client_id, error = %e, "ws: receive failed");
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => on_text(&state, client_id, &text).await,
                    Message::Binary(bytes) => {
                        debug!(%client_id, len = bytes.len(), "ws: binary frame ignored");
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if socket.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
        }
    }

    let clients = relay::leave(&state, client_id).await;
    info!(%client_id, clients, "ws: client disconnected");
}

async fn on_text(state: &AppState, client_id: Uuid, text: &Utf8Bytes) {
    match relay::relay_text(state, client_id, text).await {
        Ok(delivered) => debug!(%client_id, delivered, "ws: frame relayed"),
        Err(e) => warn!(%client_id, error = %e, "ws: invalid inbound frame"),
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
