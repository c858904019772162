//! Storage error types.

use thiserror::Error;

use super::service::PresignOperation;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Credentials were rejected by the provider.
    #[error("invalid AWS credentials: {0}")]
    InvalidCredentials(String),

    /// Object missing or not readable with the configured credentials.
    #[error("object does not exist or is not accessible: {message}")]
    NotAccessible {
        /// Object key that was checked.
        key: String,
        /// Provider error text.
        message: String,
    },

    /// Presigning failed.
    #[error("error presigning {operation} object: {message}")]
    Presign {
        /// Operation being presigned.
        operation: PresignOperation,
        /// Provider error text.
        message: String,
    },

    /// Presign operation not supported by provider.
    #[error("presign operation not supported by storage provider")]
    PresignNotSupported,
}

impl StorageError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a not accessible error.
    #[must_use]
    pub fn not_accessible(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotAccessible {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a presign error from provider error text.
    #[must_use]
    pub fn presign_failed(operation: PresignOperation, message: impl Into<String>) -> Self {
        Self::Presign {
            operation,
            message: message.into(),
        }
    }

    /// Build a presign error from an OpenDAL failure.
    #[must_use]
    pub fn presign(operation: PresignOperation, err: &opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::Unsupported => Self::PresignNotSupported,
            _ => Self::presign_failed(operation, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StorageError::not_accessible("a/b.pdf", "NotFound").to_string(),
            "object does not exist or is not accessible: NotFound"
        );
        assert_eq!(
            StorageError::Presign {
                operation: PresignOperation::Delete,
                message: "boom".to_string(),
            }
            .to_string(),
            "error presigning DELETE object: boom"
        );
    }

    #[test]
    fn test_unsupported_presign_maps_to_not_supported() {
        let err = opendal::Error::new(opendal::ErrorKind::Unsupported, "no presign");
        assert!(matches!(
            StorageError::presign(PresignOperation::Get, &err),
            StorageError::PresignNotSupported
        ));

        let err = opendal::Error::new(opendal::ErrorKind::Unexpected, "bad");
        assert!(matches!(
            StorageError::presign(PresignOperation::Put, &err),
            StorageError::Presign {
                operation: PresignOperation::Put,
                ..
            }
        ));
    }
}
