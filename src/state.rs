//! Shared relay state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds one outbound channel per connected peer, keyed by a connection id
//! minted at upgrade time. Frames are queued as `Utf8Bytes` so a rebroadcast
//! clones a refcount instead of the payload.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// Outbound half of a peer's frame queue.
pub type ClientTx = mpsc::Sender<Utf8Bytes>;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is cheap (Arc internals).
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<RwLock<HashMap<Uuid, ClientTx>>>,
    /// Capacity of each peer's outbound queue.
    pub client_buffer: usize,
}

impl AppState {
    #[must_use]
    pub fn new(client_buffer: usize) -> Self {
        Self { clients: Arc::new(RwLock::new(HashMap::new())), client_buffer }
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}
