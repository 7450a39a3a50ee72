//! Document trait: the abstraction over the host document.
//!
//! The router never touches markup directly. It writes fragments into
//! mount points, flips visibility and layout flags, sets the title, and
//! the UI initializers query elements and attach listeners, all through
//! this trait. `hashnav-dom` provides the headless implementation.

use std::sync::Arc;

use crate::error::DomError;

/// Opaque handle to an element. Stable for the element's lifetime; an
/// element removed by a content replacement never comes back, and its
/// handle is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(u64);

impl ElementRef {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A single-condition element selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[attr]`
    Attr(String),
    /// `tag`
    Tag(String),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn attr(name: impl Into<String>) -> Self {
        Self::Attr(name.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Document,
    Element(ElementRef),
}

/// An event as seen by a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    /// The element the event was dispatched on; `None` for document-level events.
    pub target: Option<ElementRef>,
    /// Key name for `KeyDown` (e.g. `"Escape"`).
    pub key: Option<String>,
}

impl DomEvent {
    pub fn click(target: ElementRef) -> Self {
        Self {
            kind: EventKind::Click,
            target: Some(target),
            key: None,
        }
    }

    pub fn key_down(key: impl Into<String>) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target: None,
            key: Some(key.into()),
        }
    }
}

/// Event listener. Receives the document so it can mutate it without
/// holding its own reference.
pub type Listener = Arc<dyn Fn(&dyn Document, &DomEvent) + Send + Sync>;

/// Called when an observed element first crosses its visibility threshold.
pub type IntersectionCallback = Arc<dyn Fn(&dyn Document, ElementRef) + Send + Sync>;

/// The host document.
///
/// Mutations on handles of removed elements are silently ignored, as they
/// would be on detached nodes.
pub trait Document: Send + Sync {
    // --- Mount points ---

    /// Whether an element with this id exists.
    fn has_mount(&self, id: &str) -> bool;

    /// Replace the content of the element with this id.
    fn set_content(&self, id: &str, markup: &str) -> std::result::Result<(), DomError>;

    /// Current inner markup of the element with this id.
    fn content(&self, id: &str) -> Option<String>;

    /// Toggle the `hidden` state of the element with this id.
    fn set_hidden(&self, id: &str, hidden: bool) -> std::result::Result<(), DomError>;

    fn is_hidden(&self, id: &str) -> Option<bool>;

    // --- Document metadata ---

    fn title(&self) -> String;

    fn set_title(&self, title: &str);

    /// Toggle a class on the layout root (the `<body>`).
    fn set_layout_flag(&self, class: &str, on: bool);

    fn has_layout_flag(&self, class: &str) -> bool;

    // --- Elements ---

    /// All matching elements in document order. With `scope`, only
    /// descendants of the element with that id.
    fn query_all(&self, scope: Option<&str>, selector: &Selector) -> Vec<ElementRef>;

    /// The element itself or its nearest ancestor matching `selector`.
    fn closest(&self, element: ElementRef, selector: &Selector) -> Option<ElementRef>;

    fn has_class(&self, element: ElementRef, class: &str) -> bool;

    fn add_class(&self, element: ElementRef, class: &str);

    fn remove_class(&self, element: ElementRef, class: &str);

    fn attribute(&self, element: ElementRef, name: &str) -> Option<String>;

    fn set_attribute(&self, element: ElementRef, name: &str, value: &str);

    fn remove_attribute(&self, element: ElementRef, name: &str);

    // --- Events ---

    fn add_listener(&self, target: EventTarget, kind: EventKind, listener: Listener);

    // --- Intersection observation ---

    /// Whether the host can observe viewport intersection at all.
    fn supports_intersection(&self) -> bool;

    /// Observe `element`; replaces any previous observation of it.
    fn observe_intersection(&self, element: ElementRef, threshold: f32, callback: IntersectionCallback);

    fn unobserve(&self, element: ElementRef);
}
