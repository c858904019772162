//! Presign orchestration.
//!
//! Validates a request, resolves its storage coordinates through the
//! metadata backend, checks the object exists where that applies, and asks
//! the storage adapter for a signed URL.

mod error;
mod service;
mod types;

pub use error::PresignError;
pub use service::PresignService;
pub use types::{
    FilePresignInput, PresignKind, PresignOutcome, PresignPolicy, PresignRequest,
    UploadPresignInput,
};
