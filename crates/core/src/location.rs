//! Location trait: the URL hash and its change notifications.

use tokio::sync::watch;

/// The navigable location of the host document.
pub trait Location: Send + Sync {
    /// Current hash including the leading `#`, or `None` when there is none.
    fn hash(&self) -> Option<String>;

    /// Replace the hash. Notifies subscribers when the value changes.
    fn set_hash(&self, hash: &str);

    /// Receive hash changes.
    fn subscribe(&self) -> watch::Receiver<Option<String>>;
}
