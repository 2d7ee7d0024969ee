//! Custom error types for verbal-crew
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for crew operations
#[derive(Error, Debug)]
pub enum CrewError {
    /// Model API answered with a non-success HTTP status
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// HTTP transport errors (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model returned a payload we could not interpret
    #[error("Malformed model response: {0}")]
    Response(String),

    /// A tool or output hook rejected the model response
    #[error("Hook error: {0}")]
    Hook(String),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for crew operations
pub type Result<T> = std::result::Result<T, CrewError>;

impl CrewError {
    /// Create a status error from an HTTP status code and response body
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed-response error
    pub fn response(msg: impl Into<String>) -> Self {
        Self::Response(msg.into())
    }

    /// Create a hook error
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::Hook(msg.into())
    }

    /// Whether the model call that produced this error may be retried.
    ///
    /// Only status-coded API failures qualify.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_transient() {
        assert!(CrewError::status(503, "unavailable").is_transient());
        assert!(CrewError::status(400, "bad request").is_transient());
    }

    #[test]
    fn test_other_errors_are_not_transient() {
        assert!(!CrewError::config("missing key").is_transient());
        assert!(!CrewError::hook("boom").is_transient());
        assert!(!CrewError::response("no candidates").is_transient());
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!CrewError::from(json_err).is_transient());
    }

    #[test]
    fn test_display() {
        let err = CrewError::status(429, "quota exceeded");
        assert_eq!(err.to_string(), "API error (429): quota exceeded");
    }
}
