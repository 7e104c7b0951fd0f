//! Unified error types for the contingency-list workspace
//!
//! [`CtgError`] separates the three outcomes callers must treat differently:
//! configuration errors are fatal, not-found outcomes are expected and
//! structured, and upstream failures are retryable.
//!
//! # Example
//!
//! ```ignore
//! use ctg_core::{CtgError, CtgResult};
//!
//! fn export(list: &str) -> CtgResult<()> {
//!     let spec = load_filter_spec(list)?;
//!     let compiled = FilterCompiler::compile(&spec)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all contingency-list operations.
#[derive(Error, Debug)]
pub enum CtgError {
    /// Invalid filter or list definition; never retried
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Requested record or network element does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// External collaborator timed out or failed; the caller may retry
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Network structure errors (dangling references, duplicate ids)
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

impl CtgError {
    /// Whether the failed operation can be attempted again unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CtgError::UpstreamUnavailable(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CtgError::NotFound(_))
    }
}

/// Convenience type alias for Results using CtgError.
pub type CtgResult<T> = Result<T, CtgError>;

impl From<anyhow::Error> for CtgError {
    fn from(err: anyhow::Error) -> Self {
        CtgError::Other(err.to_string())
    }
}

impl From<String> for CtgError {
    fn from(s: String) -> Self {
        CtgError::Other(s)
    }
}

impl From<&str> for CtgError {
    fn from(s: &str) -> Self {
        CtgError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for CtgError {
    fn from(err: serde_json::Error) -> Self {
        CtgError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for CtgError {
    fn from(err: serde_yaml::Error) -> Self {
        CtgError::Parse(err.to_string())
    }
}
