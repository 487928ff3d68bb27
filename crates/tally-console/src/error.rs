//! Custom error types for the reporting console.
//!
//! This module provides the error hierarchy for everything above the grid
//! core: access control, backend calls, selection validation, and rendering.
//!
//! Errors are serializable as `{code, message}` structs so the JSON output
//! mode can emit them alongside report payloads.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for console operations.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The signed-in identity is not the authorized account.
    #[error("Access denied for {email}: this console is restricted")]
    AccessDenied { email: String },

    /// Identity lookup against the remote auth service failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A remote backend call failed.
    #[error("Backend call failed: {0}")]
    BackendCall(String),

    /// The comparison selection is incomplete.
    #[error("{0}")]
    Validation(String),

    /// Entity name not present in the catalog.
    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),

    /// An operation needed a loaded report but none is present.
    #[error("No report loaded")]
    NoReportLoaded,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from the grid core (dataset ingest, derivation).
    #[error("Grid error: {0}")]
    Grid(#[from] tally_grid::GridError),

    /// IO error wrapper (export files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (only with the "http" feature).
    #[cfg(feature = "http")]
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ConsoleError>,
    },
}

impl ConsoleError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ConsoleError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccessDenied { .. } => "ACCESS_DENIED",
            Self::Auth(_) => "AUTH_ERROR",
            Self::BackendCall(_) => "BACKEND_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnknownEntity(_) => "UNKNOWN_ENTITY",
            Self::NoReportLoaded => "NO_REPORT_LOADED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Grid(e) => e.error_code(),
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "http")]
            Self::HttpRequest(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if retrying the triggering action can succeed.
    ///
    /// Everything except an access denial is local and retryable: a failed
    /// load leaves prior state intact, and validation errors only need a
    /// corrected selection.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::AccessDenied { .. } => false,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => true,
        }
    }
}

/// Serialize implementation for machine-readable error output.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ConsoleError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ConsoleError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

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

impl<T> ResultExt<T> for std::result::Result<T, anyhow::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ConsoleError::BackendCall(e.to_string()).with_context(context))
    }
}
