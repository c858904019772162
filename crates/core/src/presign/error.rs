//! Presign errors.

use presigner_shared::AppError;
use thiserror::Error;

/// Presign flow errors, one per response class.
#[derive(Debug, Error)]
pub enum PresignError {
    /// Required fields missing or out of range.
    #[error("{0}")]
    Validation(String),

    /// Metadata backend rejected an upload lookup.
    #[error("{0}")]
    BadRequest(String),

    /// File details or object could not be found.
    #[error("{0}")]
    NotFound(String),

    /// Signing failed.
    #[error("{0}")]
    Internal(String),
}

impl From<PresignError> for AppError {
    fn from(err: PresignError) -> Self {
        match err {
            PresignError::Validation(msg) => Self::Validation(msg),
            PresignError::BadRequest(msg) => Self::BadRequest(msg),
            PresignError::NotFound(msg) => Self::NotFound(msg),
            PresignError::Internal(msg) => Self::Internal(msg),
        }
    }
}
