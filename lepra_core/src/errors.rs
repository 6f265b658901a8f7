//! # Error Types
//!
//! Structured error types for lepra_core. Every failure carries enough
//! context for logs, while [`ScreenError::user_message`] collapses the
//! submission failures into the single generic notice shown to the user.
//!
//! ## Example
//!
//! ```rust
//! use lepra_core::errors::{ScreenError, ScreenResult};
//!
//! fn require_endpoint(url: &str) -> ScreenResult<()> {
//!     if url.trim().is_empty() {
//!         return Err(ScreenError::invalid_input("endpoint", url, "Endpoint must not be empty"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_endpoint("").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lepra_core operations
pub type ScreenResult<T> = Result<T, ScreenError>;

/// Generic text shown for any failed prediction round-trip.
pub const PREDICTION_FAILED_MESSAGE: &str = "An error occurred during prediction. Please try again.";

/// Structured error type for screening operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ScreenError {
    /// An input value is invalid (unknown field, malformed config value, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Required fields of a section are empty
    #[error("Section '{section}' is incomplete: {}", fields.join(", "))]
    IncompleteSection { section: String, fields: Vec<String> },

    /// The prediction request never produced a response
    #[error("Prediction request failed: {reason}")]
    RequestFailed { reason: String },

    /// The prediction endpoint answered with a non-success status
    #[error("Prediction endpoint returned status {status}")]
    BadStatus { status: u16 },

    /// The prediction endpoint answered with a body we could not parse
    #[error("Malformed prediction response: {reason}")]
    MalformedResponse { reason: String },

    /// Typst compilation or PDF rendering failed
    #[error("Report generation failed: {reason}")]
    ReportFailed { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Config schema is newer than this build understands
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScreenError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ScreenError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an IncompleteSection error
    pub fn incomplete_section(section: impl Into<String>, fields: Vec<String>) -> Self {
        ScreenError::IncompleteSection {
            section: section.into(),
            fields,
        }
    }

    /// Create a RequestFailed error
    pub fn request_failed(reason: impl Into<String>) -> Self {
        ScreenError::RequestFailed { reason: reason.into() }
    }

    /// Create a MalformedResponse error
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        ScreenError::MalformedResponse { reason: reason.into() }
    }

    /// Create a ReportFailed error
    pub fn report_failed(reason: impl Into<String>) -> Self {
        ScreenError::ReportFailed { reason: reason.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ScreenError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came out of the prediction round-trip
    pub fn is_prediction_failure(&self) -> bool {
        matches!(
            self,
            ScreenError::RequestFailed { .. }
                | ScreenError::BadStatus { .. }
                | ScreenError::MalformedResponse { .. }
        )
    }

    /// Text suitable for a user-facing notification.
    ///
    /// Network errors, bad statuses and malformed bodies all read the same.
    pub fn user_message(&self) -> String {
        if self.is_prediction_failure() {
            PREDICTION_FAILED_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ScreenError::InvalidInput { .. } => "INVALID_INPUT",
            ScreenError::IncompleteSection { .. } => "INCOMPLETE_SECTION",
            ScreenError::RequestFailed { .. } => "REQUEST_FAILED",
            ScreenError::BadStatus { .. } => "BAD_STATUS",
            ScreenError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            ScreenError::ReportFailed { .. } => "REPORT_FAILED",
            ScreenError::FileError { .. } => "FILE_ERROR",
            ScreenError::SerializationError { .. } => "SERIALIZATION_ERROR",
            ScreenError::VersionMismatch { .. } => "VERSION_MISMATCH",
            ScreenError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for ScreenError {
    fn from(e: serde_json::Error) -> Self {
        ScreenError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ScreenError::incomplete_section("Patient details", vec!["Age".to_string()]);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("IncompleteSection"));
        let roundtrip: ScreenError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ScreenError::BadStatus { status: 500 }.error_code(), "BAD_STATUS");
        assert_eq!(ScreenError::report_failed("x").error_code(), "REPORT_FAILED");
    }

    #[test]
    fn test_prediction_failures_share_one_message() {
        let failures = [
            ScreenError::request_failed("connection refused"),
            ScreenError::BadStatus { status: 502 },
            ScreenError::malformed_response("expected value at line 1"),
        ];
        for failure in &failures {
            assert!(failure.is_prediction_failure());
            assert_eq!(failure.user_message(), PREDICTION_FAILED_MESSAGE);
        }
    }

    #[test]
    fn test_incomplete_section_display() {
        let error = ScreenError::incomplete_section(
            "Hands",
            vec!["weak_grip".to_string(), "burns_palm".to_string()],
        );
        assert_eq!(error.to_string(), "Section 'Hands' is incomplete: weak_grip, burns_palm");
        assert!(!error.is_prediction_failure());
    }
}
