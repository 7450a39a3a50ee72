//! In-memory URL hash backed by a `watch` channel.

use hashnav_core::Location;
use tokio::sync::watch;
use tracing::debug;

pub struct MemoryLocation {
    sender: watch::Sender<Option<String>>,
}

impl MemoryLocation {
    pub fn new(initial: Option<&str>) -> Self {
        let (sender, _) = watch::channel(initial.and_then(normalize));
        Self { sender }
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new(None)
    }
}

/// `about` and `#about` both become `#about`; an empty hash is no hash.
fn normalize(hash: &str) -> Option<String> {
    let hash = hash.trim();
    match hash {
        "" | "#" => None,
        h if h.starts_with('#') => Some(h.to_string()),
        h => Some(format!("#{h}")),
    }
}

impl Location for MemoryLocation {
    fn hash(&self) -> Option<String> {
        self.sender.borrow().clone()
    }

    fn set_hash(&self, hash: &str) {
        let next = normalize(hash);
        let changed = self.sender.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
        debug!(hash = ?next, changed, "Location hash set");
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.sender.subscribe()
    }
}
