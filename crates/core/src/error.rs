//! Error types for the hashnav domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for hashnav operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Fetch errors ---
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    // --- Document errors ---
    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Why a fragment could not be fetched.
///
/// Every fetch is a single attempt. Loaders never retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {path}")]
    HttpStatus { status: u16, path: String },

    #[error("Network error for {path}: {cause}")]
    Network { path: String, cause: String },
}

impl FetchError {
    /// The fragment path the failed fetch was for.
    pub fn path(&self) -> &str {
        match self {
            FetchError::HttpStatus { path, .. } | FetchError::Network { path, .. } => path,
        }
    }

    /// HTTP status, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            FetchError::Network { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("Mount point not found: #{0}")]
    MountNotFound(String),

    #[error("Failed to parse markup: {0}")]
    Parse(String),
}
