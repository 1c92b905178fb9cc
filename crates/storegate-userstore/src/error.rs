//! Userstore directory error types.

use thiserror::Error;

/// Errors returned by a [`UserstoreDirectory`](crate::directory::UserstoreDirectory).
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Transport-level failure talking to the identity server.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}: {detail}")]
    UnexpectedStatus { status: u16, detail: String },

    /// The server rejected the access token.
    #[error("authentication failed: {0}")]
    AuthError(String),

    /// The requested userstore does not exist.
    #[error("userstore not found: {0}")]
    NotFound(String),

    /// The response body could not be decoded.
    #[error("failed to parse directory response: {0}")]
    ParseError(String),

    /// The client was configured with unusable settings.
    #[error("invalid directory configuration: {0}")]
    InvalidConfig(String),

    /// Failure injected or reported by a non-HTTP directory.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

/// Convenience Result type for directory operations.
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DirectoryError::UnexpectedStatus {
            status: 500,
            detail: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status 500: boom");

        let err = DirectoryError::NotFound("abc".to_string());
        assert_eq!(err.to_string(), "userstore not found: abc");
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DirectoryError = parse_err.into();
        assert!(matches!(err, DirectoryError::ParseError(_)));
    }
}
