//! Error handling for the spoofdetect client
//!
//! This module defines the error types used throughout the library
//! and the mapping from transport/server failures to client errors.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DetectError>;

/// Error types that can occur when talking to the detection API
#[derive(Error, Debug)]
pub enum DetectError {
    /// Transport failure: the request never produced a response
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server responded with a non-2xx status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A 401 from a protected endpoint; the session has been cleared
    /// and the caller should return to the login entry point
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Invalid parameter
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        DetectError::Network {
            message: message.into(),
        }
    }

    /// Create a new server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        DetectError::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a new invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        DetectError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        DetectError::ConfigError {
            message: message.into(),
        }
    }

    /// HTTP status of a server error, if this error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            DetectError::Server { status, .. } => Some(*status),
            DetectError::SessionExpired => Some(401),
            _ => None,
        }
    }

    /// Whether the caller should navigate back to the login entry point
    pub fn requires_login(&self) -> bool {
        matches!(self, DetectError::SessionExpired)
    }
}

impl From<reqwest::Error> for DetectError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DetectError::network(format!("request timed out: {}", err))
        } else {
            DetectError::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = DetectError::network("connection refused");
        assert!(matches!(err, DetectError::Network { .. }));

        let err = DetectError::server(409, "Username or email already exists.");
        assert!(matches!(err, DetectError::Server { status: 409, .. }));

        let err = DetectError::invalid_parameter("base_url", "must not be empty");
        assert!(matches!(err, DetectError::InvalidParameter { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = DetectError::server(401, "Invalid username or password.");
        assert_eq!(err.to_string(), "Invalid username or password.");

        let err = DetectError::network("connection refused");
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_session_expired_signals_login() {
        assert!(DetectError::SessionExpired.requires_login());
        assert_eq!(DetectError::SessionExpired.status(), Some(401));

        // A 401 from the auth surface is a plain server error and must
        // not signal a redirect.
        let err = DetectError::server(401, "Invalid username or password.");
        assert!(!err.requires_login());
    }
}
