//! Metadata lookup errors.

use thiserror::Error;

/// Metadata lookup errors.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Client could not be built.
    #[error("metadata client configuration error: {0}")]
    Configuration(String),

    /// Upload purpose is not in the allow-list.
    #[error("invalid purpose '{purpose}': must be one of {allowed}")]
    InvalidPurpose {
        /// Rejected purpose.
        purpose: String,
        /// Comma separated allow-list.
        allowed: String,
    },

    /// Request could not be sent or the body could not be read.
    #[error("error sending request: {0}")]
    Transport(String),

    /// Backend answered with a non-200 status.
    #[error("error getting {context}: status code {status}, body: {body}")]
    Status {
        /// What was being looked up.
        context: &'static str,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Response body was not the expected JSON.
    #[error("error unmarshalling {context}: {message}")]
    Decode {
        /// What was being looked up.
        context: &'static str,
        /// Decoder error text.
        message: String,
    },

    /// Backend returned an empty set.
    #[error("{context} not found")]
    NotFound {
        /// What was being looked up.
        context: &'static str,
    },
}

impl From<reqwest::Error> for MetadataError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
