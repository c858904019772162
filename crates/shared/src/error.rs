//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required request fields are missing or out of range.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request was well-formed but rejected by a collaborator.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP method not supported on this route.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Request body exceeded the size limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Request took longer than the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed => 405,
            Self::Timeout => 408,
            Self::PayloadTooLarge => 413,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Timeout => "REQUEST_TIMEOUT",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message, without the category prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::MethodNotAllowed | Self::Timeout | Self::PayloadTooLarge => self.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
