//! Post-navigation hooks.
//!
//! Every behavior that must be rebound after the DOM is replaced (reveal
//! animations, modal dialogs, page widgets such as accordions or tabs)
//! is a `NavigationHook`. Hooks are registered explicitly at startup;
//! nothing is discovered by name at runtime.

use std::sync::Arc;
use tracing::debug;

/// A capability run after every navigation.
pub trait NavigationHook: Send + Sync {
    /// Unique name of this hook (e.g., "reveal", "modal").
    fn name(&self) -> &str;

    /// Rebind behavior to the freshly injected content.
    fn after_navigate(&self);
}

/// Ordered list of hooks. Hooks run in registration order.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn NavigationHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. A hook with the same name is replaced in place.
    pub fn register(&mut self, hook: Arc<dyn NavigationHook>) {
        if let Some(slot) = self.hooks.iter_mut().find(|h| h.name() == hook.name()) {
            *slot = hook;
        } else {
            self.hooks.push(hook);
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, hook: Arc<dyn NavigationHook>) -> Self {
        self.register(hook);
        self
    }

    /// Run every hook once.
    pub fn run_all(&self) {
        for hook in &self.hooks {
            debug!(hook = %hook.name(), "Running navigation hook");
            hook.after_navigate();
        }
    }

    /// Registered hook names, in run order.
    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
