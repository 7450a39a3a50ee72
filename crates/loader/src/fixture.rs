//! In-memory fragment loader: useful for testing and embedded sites.
//!
//! Paths map to a scripted reply: a body, an HTTP status, or a network
//! failure. Unknown paths answer 404. Optional per-path delays let tests
//! stage overlapping navigations.

use async_trait::async_trait;
use hashnav_core::error::FetchError;
use hashnav_core::{FragmentLoader, FragmentPath};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16),
    NetworkFailure(String),
}

#[derive(Default)]
pub struct StaticFragmentLoader {
    replies: Mutex<HashMap<String, Reply>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
}

impl StaticFragmentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `path`.
    pub fn with_page(self, path: &str, body: &str) -> Self {
        self.set_page(path, body);
        self
    }

    /// Answer `path` with a non-2xx status.
    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.lock_replies().insert(path.to_string(), Reply::Status(status));
        self
    }

    /// Fail `path` before any response.
    pub fn with_network_error(self, path: &str, cause: &str) -> Self {
        self.lock_replies()
            .insert(path.to_string(), Reply::NetworkFailure(cause.to_string()));
        self
    }

    /// Delay every fetch of `path`.
    pub fn with_delay(self, path: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), delay);
        self
    }

    /// Replace the body served for `path`.
    pub fn set_page(&self, path: &str, body: &str) {
        self.lock_replies()
            .insert(path.to_string(), Reply::Body(body.to_string()));
    }

    /// Paths fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// How many times `path` was fetched.
    pub fn call_count(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, HashMap<String, Reply>> {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FragmentLoader for StaticFragmentLoader {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, path: &FragmentPath) -> Result<String, FetchError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());

        let delay = self
            .delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path.as_str())
            .copied();
        if let Some(delay) = delay {
            debug!(path = %path, delay_ms = delay.as_millis() as u64, "Delaying fixture fetch");
            tokio::time::sleep(delay).await;
        }

        // Read after the delay so a page replaced meanwhile is served fresh.
        let reply = self.lock_replies().get(path.as_str()).cloned();
        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(FetchError::HttpStatus {
                status,
                path: path.to_string(),
            }),
            Some(Reply::NetworkFailure(cause)) => Err(FetchError::Network {
                path: path.to_string(),
                cause,
            }),
            None => Err(FetchError::HttpStatus {
                status: 404,
                path: path.to_string(),
            }),
        }
    }
}
