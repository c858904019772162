//! In-memory collaborators for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::metadata::{FileLocation, FileLookup, MetadataError, MetadataResolver, UploadLookup};
use crate::storage::{ObjectLocation, ObjectStorage, PresignOperation, PresignedUrl, StorageError};

/// Metadata backend held in memory.
pub struct InMemoryMetadata {
    files: HashMap<i64, FileLocation>,
    upload: Option<FileLocation>,
    allowed_purposes: Vec<String>,
    file_lookups: Mutex<Vec<FileLookup>>,
    upload_lookups: Mutex<Vec<UploadLookup>>,
}

impl InMemoryMetadata {
    /// Empty backend accepting the `attachment` and `avatar` purposes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            upload: None,
            allowed_purposes: vec!["attachment".to_string(), "avatar".to_string()],
            file_lookups: Mutex::new(Vec::new()),
            upload_lookups: Mutex::new(Vec::new()),
        }
    }

    /// Register a file.
    #[must_use]
    pub fn with_file(mut self, file_id: i64, region: &str, bucket: &str, key: &str) -> Self {
        self.files.insert(
            file_id,
            FileLocation {
                file_id: Some(file_id),
                region: region.to_string(),
                bucket: bucket.to_string(),
                object_key: key.to_string(),
            },
        );
        self
    }

    /// Register a raw row, complete or not.
    #[must_use]
    pub fn with_row(mut self, file_id: i64, location: FileLocation) -> Self {
        self.files.insert(file_id, location);
        self
    }

    /// Location returned for every upload lookup.
    #[must_use]
    pub fn with_upload(mut self, location: FileLocation) -> Self {
        self.upload = Some(location);
        self
    }

    /// File lookups seen so far.
    pub fn file_lookups(&self) -> Vec<FileLookup> {
        self.file_lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Upload lookups seen so far.
    pub fn upload_lookups(&self) -> Vec<UploadLookup> {
        self.upload_lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl Default for InMemoryMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataResolver for InMemoryMetadata {
    async fn resolve_file(&self, lookup: &FileLookup) -> Result<FileLocation, MetadataError> {
        if let Ok(mut seen) = self.file_lookups.lock() {
            seen.push(lookup.clone());
        }
        self.files
            .get(&lookup.file_id)
            .cloned()
            .ok_or_else(|| MetadataError::Status {
                context: "file details",
                status: 404,
                body: "{}".to_string(),
            })
    }

    async fn resolve_upload(&self, lookup: &UploadLookup) -> Result<FileLocation, MetadataError> {
        if !self.allowed_purposes.contains(&lookup.purpose) {
            return Err(MetadataError::InvalidPurpose {
                purpose: lookup.purpose.clone(),
                allowed: self.allowed_purposes.join(", "),
            });
        }
        if let Ok(mut seen) = self.upload_lookups.lock() {
            seen.push(lookup.clone());
        }
        self.upload.clone().ok_or(MetadataError::NotFound {
            context: "upload details",
        })
    }
}

/// Object store held in memory; URLs are fake but deterministic.
#[derive(Default)]
pub struct InMemoryStorage {
    objects: HashSet<(String, String)>,
    fail_presign: bool,
    presigned: Mutex<Vec<(PresignOperation, ObjectLocation, Duration)>>,
}

impl InMemoryStorage {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object.
    #[must_use]
    pub fn with_object(mut self, bucket: &str, key: &str) -> Self {
        self.objects.insert((bucket.to_string(), key.to_string()));
        self
    }

    /// Make every presign call fail.
    #[must_use]
    pub fn failing_presign(mut self) -> Self {
        self.fail_presign = true;
        self
    }

    /// Presign calls seen so far.
    pub fn presigned(&self) -> Vec<(PresignOperation, ObjectLocation, Duration)> {
        self.presigned.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn object_exists(&self, location: &ObjectLocation) -> Result<(), StorageError> {
        if self
            .objects
            .contains(&(location.bucket.clone(), location.object_key.clone()))
        {
            Ok(())
        } else {
            Err(StorageError::not_accessible(
                &location.object_key,
                "NotFound (persistent) at stat",
            ))
        }
    }

    async fn presign(
        &self,
        operation: PresignOperation,
        location: &ObjectLocation,
        expires_in: Duration,
    ) -> Result<PresignedUrl, StorageError> {
        if self.fail_presign {
            return Err(StorageError::Presign {
                operation,
                message: "signer unavailable".to_string(),
            });
        }
        if let Ok(mut calls) = self.presigned.lock() {
            calls.push((operation, location.clone(), expires_in));
        }

        Ok(PresignedUrl {
            url: format!(
                "https://s3.{}.amazonaws.com/{}/{}?X-Amz-Expires={}",
                location.region,
                location.bucket,
                location.object_key,
                expires_in.as_secs()
            ),
            method: operation.method().to_string(),
            expires_at: Utc::now()
                + chrono::Duration::seconds(i64::try_from(expires_in.as_secs()).unwrap_or(0)),
            headers: HashMap::new(),
        })
    }
}
