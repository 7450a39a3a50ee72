//! Navigation generations.
//!
//! Each navigation takes a ticket at start. A ticket stays current until
//! a newer navigation starts; writes guarded by a stale ticket are
//! dropped. Guarded writes run under a commit lock that `start` also
//! takes, so no newer generation can begin halfway through a write.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Generations {
    latest: AtomicU64,
    commit: Mutex<()>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    shared: Arc<Generations>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier ticket.
    pub fn start(&self) -> GenerationTicket {
        let _commit = self
            .shared
            .commit
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let generation = self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationTicket {
            generation,
            shared: Some(self.shared.clone()),
        }
    }

    pub fn latest(&self) -> u64 {
        self.shared.latest.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct GenerationTicket {
    generation: u64,
    shared: Option<Arc<Generations>>,
}

impl GenerationTicket {
    /// A ticket that is never superseded, for one-off injections.
    pub fn detached() -> Self {
        Self {
            generation: 0,
            shared: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        match &self.shared {
            Some(shared) => shared.latest.load(Ordering::SeqCst) == self.generation,
            None => true,
        }
    }

    /// Run `write` if this ticket is still current, holding off any newer
    /// generation until it returns. `None` means the ticket was stale.
    ///
    /// `write` must not start a generation on the same counter.
    pub fn commit<R>(&self, write: impl FnOnce() -> R) -> Option<R> {
        let Some(shared) = &self.shared else {
            return Some(write());
        };
        let _commit = shared.commit.lock().unwrap_or_else(PoisonError::into_inner);
        if shared.latest.load(Ordering::SeqCst) != self.generation {
            return None;
        }
        Some(write())
    }
}
