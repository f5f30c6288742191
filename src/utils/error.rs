//! Error handling module
//!
//! Defines the structured API error returned by the HTTP client and the
//! application error used by the service layer and the CLI

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Status reported for failures that never produced an HTTP response
pub const NO_STATUS: u16 = 0;

/// Message used for every transport-level failure
pub const NETWORK_ERROR_MESSAGE: &str = "network error or failed to connect";

/// Structured error raised by the HTTP client
///
/// This is the only failure signal of [`crate::services::ApiClient`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The transport could not complete (connection refused, DNS, socket timeout)
    #[error("{message}")]
    Network { message: String },

    /// The backend answered with a status outside the success range
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// Anything else that went wrong while building or executing the request
    #[error("{message}")]
    Unexpected { message: String },
}

/// Discriminant of [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiErrorKind {
    Network,
    Http,
    Unexpected,
}

impl ApiError {
    /// Create a network error with the fixed transport message
    pub fn network() -> Self {
        ApiError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    /// Wrap any other failure, keeping its original message
    pub fn unexpected(source: impl std::fmt::Display) -> Self {
        ApiError::Unexpected {
            message: format!("unexpected error: {}", source),
        }
    }

    /// Build the error for a non-2xx response
    ///
    /// The message is taken from the body's `error` field, then its
    /// `message` field, then a generic status text.
    pub fn from_response(status: u16, body: Option<Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| {
                b.get("error")
                    .and_then(super::value::truthy_text)
                    .or_else(|| b.get("message").and_then(super::value::truthy_text))
            })
            .unwrap_or_else(|| format!("request failed with status {}", status));

        ApiError::Http { status, message, body }
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network { message }
            | ApiError::Http { message, .. }
            | ApiError::Unexpected { message } => message,
        }
    }

    /// HTTP status code, or [`NO_STATUS`] when no response was received
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Http { status, .. } => *status,
            ApiError::Network { .. } | ApiError::Unexpected { .. } => NO_STATUS,
        }
    }

    /// Parsed response body, if the backend sent one
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiError::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network { .. } => ApiErrorKind::Network,
            ApiError::Http { .. } => ApiErrorKind::Http,
            ApiError::Unexpected { .. } => ApiErrorKind::Unexpected,
        }
    }

    /// Whether the failure happened before any response arrived
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// JSON rendering used by the CLI when printing failures
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "kind": self.kind(),
            "status": self.status(),
            "message": self.message(),
            "data": self.data(),
        })
    }
}

/// Result type of the HTTP client
pub type ApiResult<T> = Result<T, ApiError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Backend call failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local input could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request validation failed before anything was sent
    #[error("Request validation failed: {0}")]
    Validation(String),

    /// The backend answered but its envelope reported a failure
    #[error("Backend rejected request: {0}")]
    Rejected(String),
}

impl AppError {
    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Api(e) => match e.kind() {
                ApiErrorKind::Network => "network_error",
                ApiErrorKind::Http => "http_error",
                ApiErrorKind::Unexpected => "unexpected_error",
            },
            AppError::Serialization(_) => "serialization_error",
            AppError::Io(_) => "io_error",
            AppError::Validation(_) => "invalid_request_error",
            AppError::Rejected(_) => "rejected_error",
        }
    }

    /// Process exit code used by the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) => 2,
            AppError::Config(_) => 3,
            AppError::Api(ApiError::Network { .. }) => 4,
            AppError::Api(_) | AppError::Rejected(_) => 5,
            AppError::Serialization(_) | AppError::Io(_) => 1,
        }
    }

    /// The underlying structured API error, if this failure came from the client
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            AppError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Error handling helper functions
pub mod helpers {
    use super::*;

    /// Create validation error
    pub fn validation_error(message: impl Into<String>) -> AppError {
        AppError::Validation(message.into())
    }

    /// Create rejected error
    pub fn rejected_error(message: impl Into<String>) -> AppError {
        AppError::Rejected(message.into())
    }

    /// Create configuration error
    pub fn config_error(message: impl Into<String>) -> AppError {
        AppError::Config(anyhow::anyhow!(message.into()))
    }
}

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Add validation error context
    fn validation_context(self, message: &str) -> AppResult<T>;

    /// Add configuration error context
    fn config_context(self, message: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn validation_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Validation(format!("{}: {}", message, e)))
    }

    fn config_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Config(anyhow::Error::new(e).context(message.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_prefers_error_field() {
        let err = ApiError::from_response(400, Some(json!({"error": "bad", "message": "ignored"})));
        assert_eq!(err.message(), "bad");
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_message_falls_back_to_message_field() {
        let err = ApiError::from_response(404, Some(json!({"error": "", "message": "missing"})));
        assert_eq!(err.message(), "missing");
    }

    #[test]
    fn test_message_generic_without_body() {
        let err = ApiError::from_response(502, None);
        assert_eq!(err.message(), "request failed with status 502");
        assert!(err.data().is_none());
    }

    #[test]
    fn test_sentinel_status() {
        assert_eq!(ApiError::network().status(), NO_STATUS);
        assert_eq!(ApiError::unexpected("boom").status(), NO_STATUS);
        assert_eq!(ApiError::unexpected("boom").message(), "unexpected error: boom");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(AppError::Api(ApiError::network()).error_type(), "network_error");
        assert_eq!(AppError::Validation("x".to_string()).error_type(), "invalid_request_error");
        assert_eq!(AppError::Rejected("x".to_string()).exit_code(), 5);
    }

    #[test]
    fn test_error_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found"
        ));

        if let Err(AppError::Validation(msg)) = result.validation_context("Failed to read input") {
            assert!(msg.contains("Failed to read input"));
            assert!(msg.contains("file not found"));
        } else {
            panic!("Expected validation error");
        }
    }
}
