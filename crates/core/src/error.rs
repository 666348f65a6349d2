//! Error handling for the Quarry core library

use std::fmt;
use thiserror::Error;

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;

/// Main error type for Quarry operations
///
/// Building search parameters never fails; errors come from decoding
/// explanation trees, loading configuration, and initialising logging.
#[derive(Error, Debug)]
pub enum QuarryError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An explanation tree is missing a field or has one of the wrong shape
    #[error("Malformed explanation: field '{field}' {reason}")]
    MalformedExplanation { field: String, reason: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl QuarryError {
    /// Create a malformed explanation error
    pub fn malformed_explanation<S1: Into<String>, S2: Into<String>>(
        field: S1,
        reason: S2,
    ) -> Self {
        Self::MalformedExplanation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) => ErrorCategory::FileSystem,
            Self::Json(_) | Self::Yaml(_) => ErrorCategory::Serialization,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::MalformedExplanation { .. } => ErrorCategory::Explanation,
            Self::Validation { .. } => ErrorCategory::Validation,
        }
    }
}

/// Error categories for logging
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    FileSystem,
    Serialization,
    Configuration,
    Explanation,
    Validation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileSystem => write!(f, "filesystem"),
            Self::Serialization => write!(f, "serialization"),
            Self::Configuration => write!(f, "configuration"),
            Self::Explanation => write!(f, "explanation"),
            Self::Validation => write!(f, "validation"),
        }
    }
}
