//! Peer registry and frame fan-out.
//!
//! DESIGN
//! ======
//! The relay carries no message schema. A text frame is accepted when it
//! parses as JSON and is then forwarded byte-for-byte to every other peer.
//! Delivery is best-effort: a peer whose queue is full or closed is skipped
//! for that frame and never blocks the sender.

use axum::extract::ws::Utf8Bytes;
use serde::de::IgnoredAny;
use tracing::debug;
use uuid::Uuid;

use crate::state::{AppState, ClientTx};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),
}

/// Accept any well-formed JSON document, nothing else.
pub fn validate_frame(text: &str) -> Result<(), RelayError> {
    serde_json::from_str::<IgnoredAny>(text)?;
    Ok(())
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Register a peer's outbound queue. Returns the new peer count.
pub async fn join(state: &AppState, client_id: Uuid, tx: ClientTx) -> usize {
    let mut clients = state.clients.write().await;
    clients.insert(client_id, tx);
    clients.len()
}

/// Drop a peer's outbound queue. Returns the remaining peer count.
pub async fn leave(state: &AppState, client_id: Uuid) -> usize {
    let mut clients = state.clients.write().await;
    clients.remove(&client_id);
    clients.len()
}

// =============================================================================
// FAN-OUT
// =============================================================================

/// Queue `frame` for every peer except `sender`. Returns how many peers
/// accepted it.
pub async fn broadcast(state: &AppState, sender: Uuid, frame: &Utf8Bytes) -> usize {
    let clients = state.clients.read().await;
    let mut delivered = 0;
    for (client_id, tx) in &*clients {
        if *client_id == sender {
            continue;
        }
        match tx.try_send(frame.clone()) {
            Ok(()) => delivered += 1,
            Err(e) => debug!(%client_id, error = %e, "relay: peer skipped"),
        }
    }
    delivered
}

/// Validate and fan out one inbound text frame.
pub async fn relay_text(state: &AppState, sender: Uuid, frame: &Utf8Bytes) -> Result<usize, RelayError> {
    validate_frame(frame.as_str())?;
    Ok(broadcast(state, sender, frame).await)
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
