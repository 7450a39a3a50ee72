//! Reveal-on-scroll initializer.
//!
//! Every element carrying the reveal class gets the revealed class the
//! first time it is at least `threshold` visible. Hosts without
//! intersection observation reveal everything immediately.

use std::sync::Arc;

use hashnav_core::{Document, ElementRef, IntersectionCallback, NavigationHook, Selector};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RevealSettings {
    pub class: String,
    pub revealed_class: String,
    pub threshold: f32,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            class: "reveal".into(),
            revealed_class: "is-in".into(),
            threshold: 0.12,
        }
    }
}

pub struct RevealInitializer {
    document: Arc<dyn Document>,
    settings: RevealSettings,
}

impl RevealInitializer {
    pub fn new(document: Arc<dyn Document>, settings: RevealSettings) -> Self {
        Self { document, settings }
    }

    /// Set up reveal over the elements currently in the document.
    /// Returns how many elements were observed or revealed.
    pub fn init(&self) -> usize {
        let pending: Vec<_> = self
            .document
            .query_all(None, &Selector::class(&self.settings.class))
            .into_iter()
            .filter(|el| !self.document.has_class(*el, &self.settings.revealed_class))
            .collect();

        if !self.document.supports_intersection() {
            for el in &pending {
                self.document.add_class(*el, &self.settings.revealed_class);
            }
            debug!(count = pending.len(), "Intersection unsupported, revealed immediately");
            return pending.len();
        }

        let revealed_class = self.settings.revealed_class.clone();
        let callback: IntersectionCallback = Arc::new(move |doc: &dyn Document, el: ElementRef| {
            doc.add_class(el, &revealed_class);
            doc.unobserve(el);
        });

        for el in &pending {
            self.document
                .observe_intersection(*el, self.settings.threshold, callback.clone());
        }
        debug!(count = pending.len(), threshold = self.settings.threshold, "Observing reveal elements");
        pending.len()
    }
}

impl NavigationHook for RevealInitializer {
    fn name(&self) -> &str {
        "reveal"
    }

    fn after_navigate(&self) {
        self.init();
    }
}
