//! Error types for cmod

use crate::types::{CommentId, ContentId};
use thiserror::Error;

/// Main error type for cmod
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Record not found in a collection
    #[error("Record {id} not found in '{collection}'")]
    NotFound { collection: String, id: u64 },

    /// Commenting is disabled for a content item
    #[error("Comments are closed for content item {0}")]
    CommentsClosed(ContentId),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ModerationError>,
    },
}

impl ModerationError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ModerationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) means something was missing
    pub fn is_not_found(&self) -> bool {
        match self {
            ModerationError::CommentNotFound(_)
            | ModerationError::NotFound { .. } => true,
            ModerationError::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for cmod
pub type Result<T> = std::result::Result<T, ModerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModerationError::CommentNotFound(CommentId(7));
        assert_eq!(err.to_string(), "Comment not found: 7");
    }

    #[test]
    fn test_error_with_context() {
        let err = ModerationError::Storage("disk full".to_string());
        let err = err.with_context("Failed to save comment");
        assert!(err.to_string().contains("Failed to save comment"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_is_not_found_sees_through_context() {
        let err = ModerationError::CommentNotFound(CommentId(3)).with_context("approve");
        assert!(err.is_not_found());
        assert!(!ModerationError::Validation("x".into()).is_not_found());
    }

    #[test]
    fn test_comments_closed_display() {
        let err = ModerationError::CommentsClosed(ContentId(42));
        assert_eq!(err.to_string(), "Comments are closed for content item 42");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ModerationError = io_err.into();
        assert!(matches!(err, ModerationError::Io(_)));
    }
}
