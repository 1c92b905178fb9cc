//! CLI error types.

use storegate_access::RegistryError;
use storegate_userstore::DirectoryError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("userstore directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("feature registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) => 2,
            Self::Directory(_) | Self::Registry(_) | Self::Json(_) => 1,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
