//! UI initializers for hashnav.
//!
//! Each initializer is a `NavigationHook` that rebinds behavior to the
//! content injected by the last navigation:
//!
//! - [`RevealInitializer`]: reveal-on-scroll via intersection observation
//! - [`ModalInitializer`]: open/close wiring for the modal backdrop
//! - [`FnHook`]: adapter for page-specific widgets

pub mod hooks;
pub mod modal;
pub mod reveal;

pub use hooks::FnHook;
pub use modal::{ModalBinding, ModalInitializer, ModalSettings};
pub use reveal::{RevealInitializer, RevealSettings};
