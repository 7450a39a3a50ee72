//! Closure-backed hooks for page widgets (accordions, tabs, toasts).

use hashnav_core::NavigationHook;

/// A named hook wrapping a closure.
pub struct FnHook<F> {
    name: String,
    run: F,
}

impl<F> FnHook<F>
where
    F: Fn() + Send + Sync,
{
    pub fn new(name: impl Into<String>, run: F) -> Self {
        Self {
            name: name.into(),
            run,
        }
    }
}

impl<F> NavigationHook for FnHook<F>
where
    F: Fn() + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn after_navigate(&self) {
        (self.run)();
    }
}
