//! Error types for Storm on Demand operations.
//!
//! Every failure the client can surface is a variant of [`Error`]. Transport
//! failures, unexpected HTTP statuses, missing resources and application
//! errors reported inside a response body are kept distinct so callers can
//! branch on the kind.

use serde_json::Value;
use thiserror::Error;

/// Main error type for Storm on Demand operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The request never produced a response (connection refused, DNS failure, TLS...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request timed out before a response arrived
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The API answered with a status other than 200 or 404
    #[error("Unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The API answered 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// The decoded response body carried a `full_error` key
    #[error("Storm API error: {body}")]
    Application {
        /// Full decoded response body
        body: Value,
    },

    /// A non-empty response body could not be decoded as JSON
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request parameters failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Malformed resource identifier
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Operation is not supported by the active dispatcher
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

/// Specialized result type for Storm on Demand operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Status { .. } => "HTTP_STATUS",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Application { .. } => "APPLICATION_ERROR",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidId(_) => "INVALID_ID",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::ConfigError(_) | Self::ParseError(_)
        )
    }

    /// Returns true for failures that happened below HTTP (no response was received).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Returns true if the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if the API reported an application-level failure.
    #[must_use]
    pub const fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }

    /// The `full_error` message of an application error.
    #[must_use]
    pub fn full_error(&self) -> Option<&str> {
        match self {
            Self::Application { body } => body.get("full_error").and_then(Value::as_str),
            _ => None,
        }
    }

    /// The `error_class` of an application error, e.g. `LW::Exception::RecordNotFound`.
    #[must_use]
    pub fn error_class(&self) -> Option<&str> {
        match self {
            Self::Application { body } => body.get("error_class").and_then(Value::as_str),
            _ => None,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
