//! Filesystem fragment loader: serves fragments from a site directory.
//!
//! Failures are reported with HTTP semantics so the fallback tiers behave
//! the same as against a server: a missing file is a 404, a path that
//! escapes the root or cannot be read for permission reasons is a 403.

use async_trait::async_trait;
use hashnav_core::error::FetchError;
use hashnav_core::{FragmentLoader, FragmentPath};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub struct FileFragmentLoader {
    root: PathBuf,
}

impl FileFragmentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a fragment path under the root, rejecting anything that
    /// could leave it (`..`, absolute paths, drive prefixes).
    fn resolve(&self, path: &FragmentPath) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.as_str().trim_start_matches('/'));
        let escapes = relative.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if escapes || relative.as_os_str().is_empty() {
            return Err(FetchError::HttpStatus {
                status: 403,
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FragmentLoader for FileFragmentLoader {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, path: &FragmentPath) -> Result<String, FetchError> {
        let full = self.resolve(path)?;
        debug!(loader = "file", file = %full.display(), "Reading fragment");

        tokio::fs::read_to_string(&full).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::HttpStatus {
                status: 404,
                path: path.to_string(),
            },
            ErrorKind::PermissionDenied => FetchError::HttpStatus {
                status: 403,
                path: path.to_string(),
            },
            _ => FetchError::Network {
                path: path.to_string(),
                cause: e.to_string(),
            },
        })
    }
}
