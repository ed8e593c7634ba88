//! Error types for parsing, configuration and file handling

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::ParseError;

/// Main error type for build-script operations
#[derive(Debug, Error)]
pub enum CaskError {
    /// The grammar rejected the source
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tree (de)serialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Io,
    Serialization,
    Internal,
}

impl CaskError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaskError::Parse(_) => ErrorKind::Parse,
            CaskError::Config { .. } => ErrorKind::Config,
            CaskError::Io { .. } => ErrorKind::Io,
            CaskError::Serialization { .. } => ErrorKind::Serialization,
            CaskError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Io)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CaskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CaskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
