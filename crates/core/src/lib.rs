//! # hashnav core
//!
//! Domain types, traits, and error definitions for the hashnav fragment
//! router. This crate performs **no I/O**: it defines the vocabulary
//! (routes, fragment paths, navigation outcomes) and the seams (loader,
//! document, location, hooks) that the other crates implement against.
//!
//! ## Layout
//!
//! - [`route`]: `Route`, `FragmentPath`, `SidebarAssignment`
//! - [`loader`]: the `FragmentLoader` trait
//! - [`dom`]: the `Document` trait over the host document
//! - [`location`]: the `Location` trait over the URL hash
//! - [`hook`]: post-navigation hooks and their registry
//! - [`outcome`]: per-mount and per-navigation results
//! - [`registry`]: the `BoundHandlerRegistry`
//! - [`event`]: navigation events and the broadcast bus

pub mod dom;
pub mod error;
pub mod event;
pub mod hook;
pub mod loader;
pub mod location;
pub mod outcome;
pub mod registry;
pub mod route;

// Re-export key types at crate root for ergonomics
pub use dom::{
    Document, DomEvent, ElementRef, EventKind, EventTarget, IntersectionCallback, Listener,
    Selector,
};
pub use error::{DomError, Error, FetchError, Result};
pub use event::{EventBus, NavigationEvent};
pub use hook::{HookRegistry, NavigationHook};
pub use loader::FragmentLoader;
pub use location::Location;
pub use outcome::{CompletedNavigation, InjectOutcome, NavigationReport, NavigationResult, SidebarOutcome};
pub use registry::BoundHandlerRegistry;
pub use route::{FragmentPath, Route, SidebarAssignment};
