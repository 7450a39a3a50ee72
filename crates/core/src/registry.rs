//! Registry of listener targets that already carry event listeners.
//!
//! Shared by every initializer that binds listeners, passed in explicitly
//! rather than stored as a marker on the element. A target is either an
//! element or the document itself. Entries are only ever added; a target
//! stays bound for the lifetime of the document.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::dom::EventTarget;

#[derive(Debug, Default)]
pub struct BoundHandlerRegistry {
    bound: Mutex<HashSet<(String, EventTarget)>>,
}

impl BoundHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `binding` listeners were attached to `target`.
    ///
    /// Returns `true` the first time, `false` if the pair was already bound.
    /// Callers attach listeners only on `true`.
    pub fn mark_bound(&self, binding: &str, target: EventTarget) -> bool {
        self.bound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((binding.to_string(), target))
    }

    pub fn is_bound(&self, binding: &str, target: EventTarget) -> bool {
        self.bound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(binding.to_string(), target))
    }

    pub fn len(&self) -> usize {
        self.bound.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
