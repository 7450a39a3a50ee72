//! Fragment loader implementations for hashnav.
//!
//! All loaders implement the `hashnav_core::FragmentLoader` trait.
//! `build_from_config` selects one from the validated configuration.

pub mod file;
pub mod fixture;
pub mod http;

pub use file::FileFragmentLoader;
pub use fixture::StaticFragmentLoader;
pub use http::HttpFragmentLoader;

use hashnav_config::{LoaderSource, RouterConfig};
use hashnav_core::FragmentLoader;
use std::sync::Arc;
use tracing::info;

/// Build the loader named by the configuration.
pub fn build_from_config(config: &RouterConfig) -> hashnav_core::Result<Arc<dyn FragmentLoader>> {
    let loader: Arc<dyn FragmentLoader> = match config.loader_source()? {
        LoaderSource::Http {
            base_url,
            cache_bust_query,
        } => {
            info!(base_url = %base_url, "Using HTTP fragment loader");
            Arc::new(HttpFragmentLoader::new(&base_url)?.with_cache_bust_query(cache_bust_query))
        }
        LoaderSource::File { root } => {
            info!(root = %root.display(), "Using filesystem fragment loader");
            Arc::new(FileFragmentLoader::new(root))
        }
    };
    Ok(loader)
}
