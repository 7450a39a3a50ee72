//! Headless host environment for hashnav.
//!
//! [`MemoryDocument`] implements `hashnav_core::Document` over HTML parsed
//! with `tl`; [`MemoryLocation`] implements `hashnav_core::Location` over
//! a `tokio::sync::watch` channel.

pub mod location;
pub mod memory;

pub use location::MemoryLocation;
pub use memory::{MemoryDocument, Mutation};
