//! GitSync CRD errors
//!
//! Status mutations never fail. These errors only come from the edges of the
//! crate: parsing phases or condition statuses from strings, and rendering
//! status patches or CRD manifests.

use thiserror::Error;

/// Errors that can occur when parsing or rendering GitSync types
#[derive(Debug, Error)]
pub enum CrdError {
    /// String is not a known `GitSyncPhase`
    #[error("Unknown GitSync phase: {0:?}")]
    UnknownPhase(String),

    /// String is not `True`, `False` or `Unknown`
    #[error("Unknown condition status: {0:?}")]
    UnknownConditionStatus(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML rendering error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Writing generated output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
