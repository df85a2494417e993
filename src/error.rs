//! Error types for the Twenty sync library.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors that can occur when interacting with the Twenty API.
#[derive(Error, Debug)]
pub enum TwentyApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// GraphQL response carried a non-empty `errors` array
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphqlError(Vec<String>),

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Invalid input, rejected before any request is sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A remote failure annotated with the operation that triggered it
    #[error("Failed to {operation}: {source}")]
    Context {
        operation: String,
        #[source]
        source: Box<TwentyApiError>,
    },

    /// Generic API error with context
    #[error("API error: {0}")]
    Other(String),
}

impl TwentyApiError {
    /// Wrap a remote error with the operation that produced it.
    ///
    /// Validation errors already name the offending input and are returned
    /// unchanged, as are errors that already carry context.
    pub fn with_context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Validation(_) | Self::Context { .. } => self,
            other => Self::Context {
                operation: operation.into(),
                source: Box::new(other),
            },
        }
    }

    /// Whether this error was raised before contacting the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Convenience type alias for Results with TwentyApiError
pub type TwentyApiResult<T> = Result<T, TwentyApiError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Extension for attaching operation context to remote failures.
pub trait ResultExt<T> {
    fn context(self, operation: &str) -> TwentyApiResult<T>;
}

impl<T> ResultExt<T> for TwentyApiResult<T> {
    fn context(self, operation: &str) -> TwentyApiResult<T> {
        self.map_err(|e| e.with_context(operation))
    }
}
