//! Metadata lookup types.

use serde::Deserialize;

use crate::storage::ObjectLocation;

/// Lookup of an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLookup {
    /// Logical file identifier.
    pub file_id: i64,
    /// Caller identity forwarded to the backend for row-level checks.
    pub user_id: Option<String>,
}

/// Lookup of where a new upload should be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLookup {
    /// Owning organization name.
    pub org_name: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type of the upload.
    pub mime_type: String,
    /// Upload purpose, checked against the allow-list.
    pub purpose: String,
    /// Entity the file is attached to.
    pub parent_entity_id: Option<i64>,
}

/// Storage coordinates returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLocation {
    /// File identifier echoed by the backend (absent for uploads).
    pub file_id: Option<i64>,
    /// Bucket region.
    pub region: String,
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub object_key: String,
}

impl FileLocation {
    /// True when region, bucket and key are all present.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        !self.region.is_empty() && !self.bucket.is_empty() && !self.object_key.is_empty()
    }

    /// Physical coordinates for the storage adapter.
    #[must_use]
    pub fn object_location(&self) -> ObjectLocation {
        ObjectLocation::new(&self.region, &self.bucket, &self.object_key)
    }
}

/// Row shape of the RPC responses. Nulls and missing columns are tolerated.
#[derive(Debug, Deserialize)]
pub(crate) struct LocationRow {
    #[serde(default)]
    file_id: Option<i64>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    bucket: Option<String>,
    #[serde(default)]
    object_key: Option<String>,
}

impl From<LocationRow> for FileLocation {
    fn from(row: LocationRow) -> Self {
        Self {
            file_id: row.file_id,
            region: row.region.unwrap_or_default(),
            bucket: row.bucket.unwrap_or_default(),
            object_key: row.object_key.unwrap_or_default(),
        }
    }
}

/// RPC functions answer with a single object or a set of rows.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RpcPayload {
    // Tried first: a derived struct would also accept a JSON array.
    Many(Vec<LocationRow>),
    One(LocationRow),
}

impl RpcPayload {
    /// First row, if any.
    pub(crate) fn into_first(self) -> Option<FileLocation> {
        match self {
            Self::Many(rows) => rows.into_iter().next().map(Into::into),
            Self::One(row) => Some(row.into()),
        }
    }
}
