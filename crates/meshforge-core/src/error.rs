//! Unified error handling for meshforge
//!
//! This module provides a single error type covering snapshot loading,
//! validation, and export failures across the meshforge crates.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all meshforge operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // ==================== Snapshot Errors ====================

    /// Snapshot JSON could not be decoded
    #[error("Snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// A mesh object carries structurally invalid data
    #[error("Malformed object '{object}': {message}")]
    MalformedObject {
        object: String,
        message: String,
    },

    /// Invalid data structure
    #[error("Invalid data: {message}")]
    InvalidData {
        message: String,
    },

    // ==================== General Errors ====================

    /// Custom error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Error::InvalidData {
            message: message.into(),
        }
    }

    /// Create a malformed object error
    pub fn malformed_object(object: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedObject {
            object: object.into(),
            message: message.into(),
        }
    }

    /// Check if this error concerns a single object rather than the
    /// whole export
    pub fn is_per_object(&self) -> bool {
        match self {
            Error::MalformedObject { .. } => true,
            Error::WithContext { source, .. } => source.is_per_object(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
