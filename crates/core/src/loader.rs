//! FragmentLoader trait: the abstraction over where fragments come from.
//!
//! Implementations live in `hashnav-loader` (HTTP, filesystem, fixtures).

use async_trait::async_trait;

use crate::error::FetchError;
use crate::route::FragmentPath;

/// Fetches the text body of a fragment.
///
/// Contract:
/// - every call reflects current content (no caching layer);
/// - a non-2xx response is `FetchError::HttpStatus`, anything that prevented
///   a response is `FetchError::Network`;
/// - a single attempt per call, no retries.
#[async_trait]
pub trait FragmentLoader: Send + Sync {
    /// Human-readable name of this loader (e.g., "http", "file").
    fn name(&self) -> &str;

    /// Fetch the full body of `path`.
    async fn fetch(&self, path: &FragmentPath) -> std::result::Result<String, FetchError>;
}
