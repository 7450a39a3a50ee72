//! # hashnav router
//!
//! Hash-based fragment routing over the `hashnav-core` seams:
//!
//! - [`RouteResolver`]: location hash → route
//! - [`SidebarPolicy`]: route → sidebar fragment or none
//! - [`ContentInjector`]: fetch and write with the 404 / inline-error fallback
//! - [`NavigationController`]: one full navigation, generation-guarded
//! - [`runtime::run`]: the hash-change loop

pub mod controller;
pub mod generation;
pub mod injector;
pub mod nav_links;
pub mod resolver;
pub mod runtime;
pub mod sidebar;
pub mod title;

pub use controller::{ControllerSettings, NavigationController};
pub use generation::{GenerationCounter, GenerationTicket};
pub use injector::{ContentInjector, InjectorSettings, error_fragment};
pub use nav_links::mark_active_links;
pub use resolver::RouteResolver;
pub use runtime::run;
pub use sidebar::SidebarPolicy;
pub use title::TitleFormatter;
