//! Broadcast Hub
//!
//! Fans newly-ingested articles, trending updates, and analytics snapshots
//! out to all live subscribers. Built on a bounded `tokio::sync::broadcast`
//! channel: a slow subscriber lags and drops messages instead of stalling
//! delivery to everyone else, and publishing never waits for acknowledgment.
//! There is no replay — subscribers connecting after a publish do not
//! receive past messages.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::debug;

use govwire_core::ServerMessage;

/// Per-hub broadcast buffer; a receiver further behind than this starts
/// observing `Lagged` and skips ahead.
const BROADCAST_CAPACITY: usize = 1024;

/// Unique identifier for a subscriber connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Publish/subscribe hub for pipeline deltas
pub struct BroadcastHub {
    /// Next client ID to assign
    next_client_id: AtomicU64,
    /// Broadcast channel for sending messages to all subscribers
    tx: broadcast::Sender<ServerMessage>,
}

impl BroadcastHub {
    /// Create a new hub with the default buffer size
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CAPACITY)
    }

    /// Create a hub with a custom per-subscriber buffer bound
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            next_client_id: AtomicU64::new(1),
            tx,
        }
    }

    /// Register a new subscriber.
    ///
    /// Unsubscribing is dropping the returned receiver; the id exists for
    /// logging and diagnostics.
    pub fn subscribe(&self) -> (ClientId, broadcast::Receiver<ServerMessage>) {
        let id = ClientId(self.next_client_id.fetch_add(1, Ordering::SeqCst));
        debug!("Subscriber {} connected", id);
        (id, self.tx.subscribe())
    }

    /// Send a message to every currently-connected subscriber.
    ///
    /// Fire-and-forget for the caller: delivery to each subscriber happens
    /// through their own receiver at their own pace.
    pub fn publish(&self, message: ServerMessage) {
        if let Err(e) = self.tx.send(message) {
            debug!("No subscribers connected, dropping message: {}", e);
        }
    }

    /// Number of currently-connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
