//! Presign request and result types.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::storage::PresignOperation;

/// Which presign flow a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresignKind {
    /// Download an existing object.
    Get,
    /// Upload a new object.
    Put,
    /// Delete an existing object.
    Delete,
}

impl PresignKind {
    /// Storage operation backing this flow.
    #[must_use]
    pub const fn operation(self) -> PresignOperation {
        match self {
            Self::Get => PresignOperation::Get,
            Self::Put => PresignOperation::Put,
            Self::Delete => PresignOperation::Delete,
        }
    }
}

impl FromStr for PresignKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" | "download" => Ok(Self::Get),
            "put" | "upload" => Ok(Self::Put),
            "delete" => Ok(Self::Delete),
            _ => Err(()),
        }
    }
}

/// Input for download and delete presigns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePresignInput {
    /// Logical file id; 0 means missing.
    pub file_id: i64,
    /// Requested URL lifetime in seconds; 0 means missing.
    pub expires_in: i64,
    /// Caller identity forwarded to the metadata backend.
    pub user_id: Option<String>,
}

/// Input for upload presigns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPresignInput {
    /// Owning organization.
    pub org_name: String,
    /// Requested URL lifetime in seconds; 0 means missing.
    pub expires_in: i64,
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Upload purpose.
    pub purpose: String,
    /// Parent entity; 0 is treated as absent.
    pub parent_entity_id: i64,
}

/// A presign request of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresignRequest {
    /// Download an existing file.
    Download(FilePresignInput),
    /// Delete an existing file.
    Delete(FilePresignInput),
    /// Upload a new file.
    Upload(UploadPresignInput),
}

impl PresignRequest {
    /// Kind of this request.
    #[must_use]
    pub const fn kind(&self) -> PresignKind {
        match self {
            Self::Download(_) => PresignKind::Get,
            Self::Delete(_) => PresignKind::Delete,
            Self::Upload(_) => PresignKind::Put,
        }
    }
}

/// Successful presign.
#[derive(Debug, Clone)]
pub struct PresignOutcome {
    /// Signed URL.
    pub url: String,
    /// HTTP method the URL is valid for.
    pub method: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Key the upload will be stored under (uploads only).
    pub object_key: Option<String>,
}

/// Limits applied to every presign.
#[derive(Debug, Clone, Copy)]
pub struct PresignPolicy {
    /// Upper bound for `expires_in`.
    pub max_expires_in_secs: u64,
}

impl PresignPolicy {
    /// SigV4 maximum: seven days.
    pub const DEFAULT_MAX_EXPIRES_IN: u64 = 604_800;
}

impl Default for PresignPolicy {
    fn default() -> Self {
        Self {
            max_expires_in_secs: Self::DEFAULT_MAX_EXPIRES_IN,
        }
    }
}
