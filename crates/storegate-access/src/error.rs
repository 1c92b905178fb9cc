//! Error types for the scope/feature registry.

use thiserror::Error;

/// Errors returned by a [`FeatureRegistry`](crate::registry::FeatureRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No configuration exists for the requested feature key.
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// The feature configuration document could not be decoded.
    #[error("Invalid feature configuration: {0}")]
    InvalidDocument(String),

    /// The feature configuration document could not be read.
    #[error("Failed to read feature configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The registry backend failed.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidDocument(err.to_string())
    }
}

/// Convenience Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
