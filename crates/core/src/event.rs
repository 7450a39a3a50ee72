//! Navigation events: observe the router without coupling to it.
//!
//! The controller publishes an event at each step of a navigation.
//! Hosts (the CLI `watch` command, tests) subscribe and filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All navigation events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NavigationEvent {
    /// A navigation began for a route
    NavigationStarted {
        generation: u64,
        route: String,
        timestamp: DateTime<Utc>,
    },

    /// A primary fragment failed and the fallback tier was used
    FragmentFallback {
        mount: String,
        primary: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// A navigation ran to completion
    NavigationCompleted {
        generation: u64,
        route: String,
        outcome: String, // "success", "degraded", "failed", "no-mount"
        title: String,
        timestamp: DateTime<Utc>,
    },

    /// A navigation was overtaken by a newer one and discarded its writes
    NavigationSuperseded {
        generation: u64,
        route: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for navigation events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<NavigationEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: NavigationEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<NavigationEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
