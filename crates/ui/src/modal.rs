//! Modal dialog initializer.
//!
//! Binds open/close behavior to the `[data-modal-backdrop]` element:
//! `[data-open-modal]` opens it, `[data-close-modal]`, a click on the
//! backdrop itself, or Escape close it. Trigger and Escape listeners live
//! on the document and look the backdrop up when they fire, so they are
//! bound once per document even when the backdrop arrives with injected
//! content. The backdrop-click listener is bound once per backdrop element.
//! Both are tracked in the shared [`BoundHandlerRegistry`].

use std::sync::Arc;

use hashnav_core::{
    BoundHandlerRegistry, Document, DomEvent, ElementRef, EventKind, EventTarget, Listener,
    NavigationHook, Selector,
};
use tracing::{debug, trace};

pub const BACKDROP_ATTR: &str = "data-modal-backdrop";
pub const OPEN_ATTR: &str = "data-open-modal";
pub const CLOSE_ATTR: &str = "data-close-modal";

const BINDING: &str = "modal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSettings {
    pub open_class: String,
}

impl Default for ModalSettings {
    fn default() -> Self {
        Self {
            open_class: "is-open".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalBinding {
    /// No backdrop in the document.
    NoBackdrop,
    AlreadyBound,
    Bound,
}

pub struct ModalInitializer {
    document: Arc<dyn Document>,
    registry: Arc<BoundHandlerRegistry>,
    settings: ModalSettings,
}

fn current_backdrop(doc: &dyn Document) -> Option<ElementRef> {
    doc.query_all(None, &Selector::attr(BACKDROP_ATTR))
        .into_iter()
        .next()
}

fn open(doc: &dyn Document, backdrop: ElementRef, class: &str) {
    doc.add_class(backdrop, class);
    doc.set_attribute(backdrop, "aria-hidden", "false");
}

fn close(doc: &dyn Document, backdrop: ElementRef, class: &str) {
    doc.remove_class(backdrop, class);
    doc.set_attribute(backdrop, "aria-hidden", "true");
}

impl ModalInitializer {
    pub fn new(
        document: Arc<dyn Document>,
        registry: Arc<BoundHandlerRegistry>,
        settings: ModalSettings,
    ) -> Self {
        Self {
            document,
            registry,
            settings,
        }
    }

    pub fn init(&self) -> ModalBinding {
        let Some(backdrop) = current_backdrop(self.document.as_ref()) else {
            trace!("No modal backdrop present");
            return ModalBinding::NoBackdrop;
        };

        let document_bound = self.registry.mark_bound(BINDING, EventTarget::Document);
        if document_bound {
            self.bind_document();
        }

        let backdrop_bound = self
            .registry
            .mark_bound(BINDING, EventTarget::Element(backdrop));
        if backdrop_bound {
            self.bind_backdrop(backdrop);
        }

        if document_bound || backdrop_bound {
            debug!(backdrop = backdrop.raw(), document_bound, backdrop_bound, "Modal listeners bound");
            ModalBinding::Bound
        } else {
            trace!(backdrop = backdrop.raw(), "Modal already bound");
            ModalBinding::AlreadyBound
        }
    }

    fn bind_document(&self) {
        // Delegated so triggers injected by later navigations work without
        // rebinding.
        let class = self.settings.open_class.clone();
        let triggers: Listener = Arc::new(move |doc: &dyn Document, event: &DomEvent| {
            let Some(target) = event.target else {
                return;
            };
            let Some(backdrop) = current_backdrop(doc) else {
                return;
            };
            if doc.closest(target, &Selector::attr(OPEN_ATTR)).is_some() {
                open(doc, backdrop, &class);
            } else if doc.closest(target, &Selector::attr(CLOSE_ATTR)).is_some() {
                close(doc, backdrop, &class);
            }
        });
        self.document
            .add_listener(EventTarget::Document, EventKind::Click, triggers);

        let class = self.settings.open_class.clone();
        let escape: Listener = Arc::new(move |doc: &dyn Document, event: &DomEvent| {
            if event.key.as_deref() != Some("Escape") {
                return;
            }
            if let Some(backdrop) = current_backdrop(doc) {
                close(doc, backdrop, &class);
            }
        });
        self.document
            .add_listener(EventTarget::Document, EventKind::KeyDown, escape);
    }

    fn bind_backdrop(&self, backdrop: ElementRef) {
        let class = self.settings.open_class.clone();
        let backdrop_click: Listener = Arc::new(move |doc: &dyn Document, event: &DomEvent| {
            if event.target == Some(backdrop) {
                close(doc, backdrop, &class);
            }
        });
        self.document
            .add_listener(EventTarget::Element(backdrop), EventKind::Click, backdrop_click);
    }
}

impl NavigationHook for ModalInitializer {
    fn name(&self) -> &str {
        "modal"
    }

    fn after_navigate(&self) {
        self.init();
    }
}
