//! Error types and result aliases for memo operations.
//!
//! These errors stay inside the cache layer: the memoization wrapper turns
//! them into reported events and a cache miss instead of returning them.

use thiserror::Error;

/// Unified error type for all memo operations
#[derive(Error, Debug)]
pub enum MemoError {
    // Config errors
    #[error("Failed to parse memo.toml: {message}")]
    TomlParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error("Unknown hash algorithm '{name}' (expected md5, blake3 or sha256)")]
    UnknownAlgorithm { name: String },

    // Codec errors
    #[error("Failed to encode value: {message}")]
    Encode { message: String },

    #[error("Failed to decode value: {message}")]
    Decode { message: String },

    // IO errors
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for memo operations
pub type MemoResult<T> = Result<T, MemoError>;

impl MemoError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create an encode error from any displayable codec error
    pub fn encode(err: impl std::fmt::Display) -> Self {
        Self::Encode {
            message: err.to_string(),
        }
    }

    /// Create a decode error from any displayable codec error
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            MemoError::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => {
                Some("Check that the cache path is writable by the current user")
            },
            MemoError::Decode { .. } => {
                Some("The cache file is corrupt or was written with another codec; delete it to rebuild")
            },
            MemoError::UnknownAlgorithm { .. } => Some("Use one of: md5, blake3, sha256"),
            MemoError::TomlParse { .. } => Some("Fix the syntax error in memo.toml"),
            _ => None,
        }
    }
}
