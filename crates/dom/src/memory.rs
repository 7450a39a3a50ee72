//! Headless host document.
//!
//! `MemoryDocument` parses an HTML shell with `tl` into a small node
//! tree and implements [`Document`] over it: content replacement per
//! mount, class/attribute mutation, bubbling click and key events, and
//! scripted intersection observation. It is what the CLI renders into and
//! what the tests assert against.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hashnav_core::dom::{
    Document, DomEvent, ElementRef, EventKind, EventTarget, IntersectionCallback, Listener,
    Selector,
};
use hashnav_core::error::DomError;
use tracing::{debug, trace};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A recorded mutating call, in call order. Repeated calls that change
/// nothing are still recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    ContentReplaced { id: String },
    HiddenSet { id: String, hidden: bool },
    TitleSet { title: String },
    LayoutFlagSet { class: String, on: bool },
    ClassAdded { element: ElementRef, class: String },
    ClassRemoved { element: ElementRef, class: String },
    AttributeSet { element: ElementRef, name: String, value: String },
    AttributeRemoved { element: ElementRef, name: String },
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attrs: Vec<(String, Option<String>)>,
}

impl ElementData {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    fn set_attr(&mut self, name: &str, value: Option<String>) {
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let list = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr("class", Some(list));
    }

    fn remove_class(&mut self, class: &str) {
        let Some(existing) = self.attr("class") else {
            return;
        };
        let remaining: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        let remaining = remaining.join(" ");
        self.set_attr("class", Some(remaining));
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Id(id) => self.attr("id") == Some(id.as_str()),
            Selector::Class(class) => self.has_class(class),
            Selector::Attr(name) => self.has_attr(name),
            Selector::Tag(tag) => self.tag.eq_ignore_ascii_case(tag),
        }
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<u64>,
    children: Vec<u64>,
}

struct Observation {
    threshold: f32,
    callback: IntersectionCallback,
}

struct Inner {
    next_id: u64,
    nodes: HashMap<u64, Node>,
    roots: Vec<u64>,
    title: String,
    listeners: Vec<(EventTarget, EventKind, Listener)>,
    observers: HashMap<ElementRef, Observation>,
    intersection_supported: bool,
    journal: Vec<Mutation>,
}

impl Inner {
    fn empty() -> Self {
        Self {
            next_id: 1,
            nodes: HashMap::new(),
            roots: Vec::new(),
            title: String::new(),
            listeners: Vec::new(),
            observers: HashMap::new(),
            intersection_supported: true,
            journal: Vec::new(),
        }
    }

    fn alloc(&mut self, data: NodeData, parent: Option<u64>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                data,
                parent,
                children: Vec::new(),
            },
        );
        id
    }

    fn element(&self, id: u64) -> Option<&ElementData> {
        match self.nodes.get(&id).map(|n| &n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: u64) -> Option<&mut ElementData> {
        match self.nodes.get_mut(&id).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Element ids in document order, starting below `from` (or at the roots).
    fn walk(&self, from: Option<u64>) -> Vec<u64> {
        let start: Vec<u64> = match from {
            Some(id) => self.nodes.get(&id).map(|n| n.children.clone()).unwrap_or_default(),
            None => self.roots.clone(),
        };
        let mut out = Vec::new();
        let mut stack: Vec<u64> = start.into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if matches!(node.data, NodeData::Element(_)) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn find_by_id(&self, id: &str) -> Option<u64> {
        let selector = Selector::Id(id.to_string());
        self.walk(None)
            .into_iter()
            .find(|n| self.element(*n).is_some_and(|el| el.matches(&selector)))
    }

    /// Drop every descendant of `id`, with their listeners and observers.
    fn clear_children(&mut self, id: u64) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let mut stack = std::mem::take(&mut node.children);
        let mut removed = Vec::new();
        while let Some(child) = stack.pop() {
            if let Some(node) = self.nodes.remove(&child) {
                stack.extend(node.children);
                removed.push(ElementRef::new(child));
            }
        }
        self.listeners.retain(|(target, _, _)| match target {
            EventTarget::Element(el) => !removed.contains(el),
            EventTarget::Document => true,
        });
        self.observers.retain(|el, _| !removed.contains(el));
    }

    /// Parse `markup` and append it below `parent` (or as roots).
    fn append_markup(&mut self, parent: Option<u64>, markup: &str) -> Result<(), DomError> {
        let dom = tl::parse(markup, tl::ParserOptions::default())
            .map_err(|e| DomError::Parse(format!("{e:?}")))?;
        let parser = dom.parser();
        for handle in dom.children() {
            if let Some(child) = self.adopt(*handle, parser, parent) {
                match parent {
                    Some(p) => {
                        if let Some(node) = self.nodes.get_mut(&p) {
                            node.children.push(child);
                        }
                    }
                    None => self.roots.push(child),
                }
            }
        }
        Ok(())
    }

    /// Convert a tl node (and its subtree) into owned nodes.
    fn adopt(&mut self, handle: tl::NodeHandle, parser: &tl::Parser, parent: Option<u64>) -> Option<u64> {
        let node = handle.get(parser)?;

        match node {
            tl::Node::Tag(tag) => {
                let tag_name = tag.name().as_utf8_str().to_lowercase();

                let tag_attrs = tag.attributes();
                let mut attrs: Vec<(String, Option<String>)> = Vec::new();
                if let Some(id) = tag_attrs.id() {
                    attrs.push(("id".into(), Some(id.as_utf8_str().to_string())));
                }
                if let Some(class) = tag_attrs.class() {
                    attrs.push(("class".into(), Some(class.as_utf8_str().to_string())));
                }
                for (key, value) in tag_attrs.iter() {
                    let key_str: &str = key.as_ref();
                    if key_str.eq_ignore_ascii_case("id") || key_str.eq_ignore_ascii_case("class") {
                        continue;
                    }
                    attrs.push((key_str.to_string(), value.map(|v| v.to_string())));
                }

                if tag_name == "title" && self.title.is_empty() {
                    self.title = tag.inner_text(parser).trim().to_string();
                }

                let id = self.alloc(
                    NodeData::Element(ElementData {
                        tag: tag_name,
                        attrs,
                    }),
                    parent,
                );

                let children: Vec<tl::NodeHandle> = tag.children().top().iter().copied().collect();
                for child_handle in children {
                    if let Some(child) = self.adopt(child_handle, parser, Some(id))
                        && let Some(node) = self.nodes.get_mut(&id)
                    {
                        node.children.push(child);
                    }
                }

                Some(id)
            }
            tl::Node::Raw(bytes) => {
                let text = bytes.as_utf8_str().to_string();
                if text.is_empty() {
                    None
                } else {
                    Some(self.alloc(NodeData::Text(text), parent))
                }
            }
            tl::Node::Comment(_) => None,
        }
    }

    fn serialize_into(&self, id: u64, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (key, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(key);
                    if let Some(value) = value {
                        out.push_str("=\"");
                        out.push_str(&value.replace('"', "&quot;"));
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                for child in &node.children {
                    self.serialize_into(*child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }

    fn inner_html(&self, id: u64) -> String {
        let mut out = String::new();
        if let Some(node) = self.nodes.get(&id) {
            for child in &node.children {
                self.serialize_into(*child, &mut out);
            }
        }
        out
    }

    fn body(&self) -> Option<u64> {
        let selector = Selector::Tag("body".into());
        self.walk(None)
            .into_iter()
            .find(|n| self.element(*n).is_some_and(|el| el.matches(&selector)))
    }

    /// The element and its element ancestors, innermost first.
    fn ancestry(&self, id: u64) -> Vec<u64> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(&current) else {
                break;
            };
            if matches!(node.data, NodeData::Element(_)) {
                chain.push(current);
            }
            cursor = node.parent;
        }
        chain
    }
}

/// In-memory implementation of [`Document`].
pub struct MemoryDocument {
    inner: Mutex<Inner>,
}

impl MemoryDocument {
    /// Parse a full HTML shell (the host page with its mount points).
    pub fn from_html(shell: &str) -> Result<Self, DomError> {
        let mut inner = Inner::empty();
        inner.append_markup(None, shell)?;
        debug!(nodes = inner.nodes.len(), title = %inner.title, "Parsed document shell");
        Ok(Self {
            inner: Mutex::new(inner),
        })
    }

    /// A minimal shell: an empty `<body>` holding one `<div>` per mount id.
    pub fn with_mounts(ids: &[&str]) -> Self {
        let mut inner = Inner::empty();
        let body = inner.alloc(
            NodeData::Element(ElementData {
                tag: "body".into(),
                attrs: Vec::new(),
            }),
            None,
        );
        inner.roots.push(body);
        for id in ids {
            let div = inner.alloc(
                NodeData::Element(ElementData {
                    tag: "div".into(),
                    attrs: vec![("id".into(), Some((*id).to_string()))],
                }),
                Some(body),
            );
            if let Some(node) = inner.nodes.get_mut(&body) {
                node.children.push(div);
            }
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Simulate a host without intersection observation.
    pub fn without_intersection(self) -> Self {
        self.lock().intersection_supported = false;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        let inner = self.lock();
        let mut out = String::new();
        for root in &inner.roots {
            inner.serialize_into(*root, &mut out);
        }
        out
    }

    /// Dispatch `event`. Element listeners run innermost first, then
    /// document listeners. Listeners run without the document lock held.
    pub fn dispatch(&self, event: DomEvent) {
        let listeners: Vec<Listener> = {
            let inner = self.lock();
            let mut path: Vec<EventTarget> = event
                .target
                .map(|el| {
                    inner
                        .ancestry(el.raw())
                        .into_iter()
                        .map(|id| EventTarget::Element(ElementRef::new(id)))
                        .collect()
                })
                .unwrap_or_default();
            path.push(EventTarget::Document);

            let mut matched = Vec::new();
            for target in &path {
                for (t, kind, listener) in &inner.listeners {
                    if t == target && *kind == event.kind {
                        matched.push(listener.clone());
                    }
                }
            }
            matched
        };

        trace!(kind = ?event.kind, listeners = listeners.len(), "Dispatching event");
        let document: &dyn Document = self;
        for listener in listeners {
            listener(document, &event);
        }
    }

    pub fn click(&self, element: ElementRef) {
        self.dispatch(DomEvent::click(element));
    }

    pub fn press_key(&self, key: &str) {
        self.dispatch(DomEvent::key_down(key));
    }

    /// Report that `element` is `ratio` visible. Fires its observer when
    /// the ratio reaches the observed threshold.
    pub fn scroll_into_view(&self, element: ElementRef, ratio: f32) {
        let callback = {
            let inner = self.lock();
            inner
                .observers
                .get(&element)
                .filter(|obs| ratio >= obs.threshold)
                .map(|obs| obs.callback.clone())
        };
        if let Some(callback) = callback {
            let document: &dyn Document = self;
            callback(document, element);
        }
    }

    pub fn is_observed(&self, element: ElementRef) -> bool {
        self.lock().observers.contains_key(&element)
    }

    pub fn observed_count(&self) -> usize {
        self.lock().observers.len()
    }

    /// Listeners attached to `target` for `kind`.
    pub fn listener_count(&self, target: EventTarget, kind: EventKind) -> usize {
        self.lock()
            .listeners
            .iter()
            .filter(|(t, k, _)| *t == target && *k == kind)
            .count()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.lock().journal.clone()
    }

    pub fn clear_mutations(&self) {
        self.lock().journal.clear();
    }
}

impl Document for MemoryDocument {
    fn has_mount(&self, id: &str) -> bool {
        self.lock().find_by_id(id).is_some()
    }

    fn set_content(&self, id: &str, markup: &str) -> Result<(), DomError> {
        let mut inner = self.lock();
        let node = inner
            .find_by_id(id)
            .ok_or_else(|| DomError::MountNotFound(id.to_string()))?;

        inner.clear_children(node);
        if let Err(e) = inner.append_markup(Some(node), markup) {
            // Unparseable markup is kept verbatim as text.
            debug!(mount = %id, error = %e, "Storing unparsed markup as text");
            let text = inner.alloc(NodeData::Text(markup.to_string()), Some(node));
            if let Some(n) = inner.nodes.get_mut(&node) {
                n.children.push(text);
            }
        }
        inner.journal.push(Mutation::ContentReplaced { id: id.to_string() });
        Ok(())
    }

    fn content(&self, id: &str) -> Option<String> {
        let inner = self.lock();
        inner.find_by_id(id).map(|node| inner.inner_html(node))
    }

    fn set_hidden(&self, id: &str, hidden: bool) -> Result<(), DomError> {
        let mut inner = self.lock();
        let node = inner
            .find_by_id(id)
            .ok_or_else(|| DomError::MountNotFound(id.to_string()))?;
        if let Some(el) = inner.element_mut(node) {
            if hidden {
                el.set_attr("hidden", None);
            } else {
                el.remove_attr("hidden");
            }
        }
        inner.journal.push(Mutation::HiddenSet {
            id: id.to_string(),
            hidden,
        });
        Ok(())
    }

    fn is_hidden(&self, id: &str) -> Option<bool> {
        let inner = self.lock();
        let node = inner.find_by_id(id)?;
        inner.element(node).map(|el| el.has_attr("hidden"))
    }

    fn title(&self) -> String {
        self.lock().title.clone()
    }

    fn set_title(&self, title: &str) {
        let mut inner = self.lock();
        inner.title = title.to_string();
        inner.journal.push(Mutation::TitleSet {
            title: title.to_string(),
        });
    }

    fn set_layout_flag(&self, class: &str, on: bool) {
        let mut inner = self.lock();
        let Some(body) = inner.body() else {
            return;
        };
        if let Some(el) = inner.element_mut(body) {
            if on {
                el.add_class(class);
            } else {
                el.remove_class(class);
            }
        }
        inner.journal.push(Mutation::LayoutFlagSet {
            class: class.to_string(),
            on,
        });
    }

    fn has_layout_flag(&self, class: &str) -> bool {
        let inner = self.lock();
        inner
            .body()
            .and_then(|body| inner.element(body))
            .is_some_and(|el| el.has_class(class))
    }

    fn query_all(&self, scope: Option<&str>, selector: &Selector) -> Vec<ElementRef> {
        let inner = self.lock();
        let from = match scope {
            Some(id) => match inner.find_by_id(id) {
                Some(node) => Some(node),
                None => return Vec::new(),
            },
            None => None,
        };
        inner
            .walk(from)
            .into_iter()
            .filter(|id| inner.element(*id).is_some_and(|el| el.matches(selector)))
            .map(ElementRef::new)
            .collect()
    }

    fn closest(&self, element: ElementRef, selector: &Selector) -> Option<ElementRef> {
        let inner = self.lock();
        inner
            .ancestry(element.raw())
            .into_iter()
            .find(|id| inner.element(*id).is_some_and(|el| el.matches(selector)))
            .map(ElementRef::new)
    }

    fn has_class(&self, element: ElementRef, class: &str) -> bool {
        self.lock()
            .element(element.raw())
            .is_some_and(|el| el.has_class(class))
    }

    fn add_class(&self, element: ElementRef, class: &str) {
        let mut inner = self.lock();
        if let Some(el) = inner.element_mut(element.raw()) {
            el.add_class(class);
            inner.journal.push(Mutation::ClassAdded {
                element,
                class: class.to_string(),
            });
        }
    }

    fn remove_class(&self, element: ElementRef, class: &str) {
        let mut inner = self.lock();
        if let Some(el) = inner.element_mut(element.raw()) {
            el.remove_class(class);
            inner.journal.push(Mutation::ClassRemoved {
                element,
                class: class.to_string(),
            });
        }
    }

    fn attribute(&self, element: ElementRef, name: &str) -> Option<String> {
        self.lock()
            .element(element.raw())
            .and_then(|el| el.attr(name).map(str::to_string))
    }

    fn set_attribute(&self, element: ElementRef, name: &str, value: &str) {
        let mut inner = self.lock();
        if let Some(el) = inner.element_mut(element.raw()) {
            el.set_attr(name, Some(value.to_string()));
            inner.journal.push(Mutation::AttributeSet {
                element,
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    fn remove_attribute(&self, element: ElementRef, name: &str) {
        let mut inner = self.lock();
        if let Some(el) = inner.element_mut(element.raw()) {
            el.remove_attr(name);
            inner.journal.push(Mutation::AttributeRemoved {
                element,
                name: name.to_string(),
            });
        }
    }

    fn add_listener(&self, target: EventTarget, kind: EventKind, listener: Listener) {
        let mut inner = self.lock();
        if let EventTarget::Element(el) = target
            && inner.element(el.raw()).is_none()
        {
            return;
        }
        inner.listeners.push((target, kind, listener));
    }

    fn supports_intersection(&self) -> bool {
        self.lock().intersection_supported
    }

    fn observe_intersection(&self, element: ElementRef, threshold: f32, callback: IntersectionCallback) {
        let mut inner = self.lock();
        if !inner.intersection_supported || inner.element(element.raw()).is_none() {
            return;
        }
        inner
            .observers
            .insert(element, Observation { threshold, callback });
    }

    fn unobserve(&self, element: ElementRef) {
        self.lock().observers.remove(&element);
    }
}
