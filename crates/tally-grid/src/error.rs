//! Error types for the data grid core.
//!
//! This module provides the crate-wide error hierarchy using `thiserror`.
//! Errors are serializable as `{code, message}` structs so a host can hand
//! them to a UI or log sink without caring about the concrete variant.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for grid operations.
#[derive(Error, Debug)]
pub enum GridError {
    /// A record in an ingested payload was not a JSON object.
    #[error("Record at index {index} is not an object")]
    InvalidRecord { index: usize },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<GridError>,
    },
}

impl GridError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        GridError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for host-side handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRecord { .. } => "INVALID_RECORD",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

/// Serialize implementation for host-boundary compatibility.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for GridError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("GridError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| GridError::Json(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            GridError::InvalidRecord { index: 3 }.error_code(),
            "INVALID_RECORD"
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = GridError::InvalidRecord { index: 7 };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INVALID_RECORD"));
        assert!(json.contains("index 7"));
    }

    #[test]
    fn test_with_context() {
        let error = GridError::InvalidRecord { index: 0 }.with_context("During report ingest");
        assert!(error.to_string().contains("During report ingest"));
        assert_eq!(error.error_code(), "INVALID_RECORD"); // Preserves original code
    }
}
