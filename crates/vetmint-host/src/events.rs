//! Event emission system.
//!
//! Committed notifications are pushed to in-process subscribers. Each
//! subscriber has an independent buffer; a slow subscriber lags and skips
//! events rather than blocking the command loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use vetmint_types::Notification;

/// A committed notification as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Engine sequence number.
    pub sequence: u64,
    /// Unix timestamp of the commit.
    pub timestamp: u64,
    #[serde(flatten)]
    pub notification: Notification,
}

impl Event {
    /// Stamp an engine event with its commit time.
    pub fn committed(event: vetmint_types::Event, timestamp: u64) -> Self {
        Self {
            sequence: event.sequence,
            timestamp,
            notification: event.notification,
        }
    }
}

/// Event bus for broadcasting events to subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    emitted: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            emitted: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: Event) {
        self.emitted.fetch_add(1, Ordering::SeqCst);
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events. Returns a receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Number of events emitted since startup.
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::SeqCst)
    }
}
