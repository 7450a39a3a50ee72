//! HTTP fragment loader built on `reqwest`.
//!
//! Every request is sent with caching disabled (`Cache-Control`, `Pragma`
//! and, by default, a `_=<millis>` query parameter) so a fragment always
//! reflects what the server has now. One attempt per fetch, no timeout.

use async_trait::async_trait;
use hashnav_core::error::FetchError;
use hashnav_core::{FragmentLoader, FragmentPath};
use reqwest::Url;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::{debug, warn};

pub struct HttpFragmentLoader {
    client: reqwest::Client,
    base_url: Url,
    cache_bust_query: bool,
}

impl HttpFragmentLoader {
    /// Create a loader resolving fragment paths against `base_url`.
    pub fn new(base_url: &str) -> hashnav_core::Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| hashnav_core::Error::Config {
            message: format!("Invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            cache_bust_query: true,
        })
    }

    /// Toggle the `_=<millis>` query parameter.
    pub fn with_cache_bust_query(mut self, enabled: bool) -> Self {
        self.cache_bust_query = enabled;
        self
    }

    /// Absolute URL for a fragment path, without the cache-busting query.
    pub fn url_for(&self, path: &FragmentPath) -> Result<Url, FetchError> {
        self.base_url
            .join(path.as_str().trim_start_matches('/'))
            .map_err(|e| FetchError::Network {
                path: path.to_string(),
                cause: format!("invalid URL: {e}"),
            })
    }
}

#[async_trait]
impl FragmentLoader for HttpFragmentLoader {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, path: &FragmentPath) -> Result<String, FetchError> {
        let mut url = self.url_for(path)?;
        if self.cache_bust_query {
            url.query_pairs_mut()
                .append_pair("_", &chrono::Utc::now().timestamp_millis().to_string());
        }

        debug!(loader = "http", url = %url, "Fetching fragment");

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| FetchError::Network {
                path: path.to_string(),
                cause: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), path = %path, "Fragment request returned error status");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response.text().await.map_err(|e| FetchError::Network {
            path: path.to_string(),
            cause: format!("failed to read body: {e}"),
        })
    }
}
