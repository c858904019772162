//! Presign service implementation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::error::PresignError;
use super::types::{
    FilePresignInput, PresignKind, PresignOutcome, PresignPolicy, PresignRequest,
    UploadPresignInput,
};
use crate::metadata::{FileLookup, MetadataResolver, UploadLookup};
use crate::storage::ObjectStorage;

const MISSING_FILE_FIELDS: &str = "Missing required fields: file_id, expires_in";
const MISSING_UPLOAD_FIELDS: &str =
    "Missing required fields: org_name, expires_in, file_name, mime_type, purpose";
const FILE_DETAILS_NOT_FOUND: &str = "File details not found";
const UPLOAD_DETAILS_NOT_FOUND: &str = "Failed to get upload details";

/// Orchestrates metadata resolution and URL signing.
pub struct PresignService {
    metadata: Arc<dyn MetadataResolver>,
    storage: Arc<dyn ObjectStorage>,
    policy: PresignPolicy,
}

impl PresignService {
    /// Create a new presign service.
    #[must_use]
    pub fn new(
        metadata: Arc<dyn MetadataResolver>,
        storage: Arc<dyn ObjectStorage>,
        policy: PresignPolicy,
    ) -> Self {
        Self {
            metadata,
            storage,
            policy,
        }
    }

    /// Presign a download of an existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, lookup, the existence check or
    /// signing fails.
    pub async fn presign_download(
        &self,
        input: FilePresignInput,
    ) -> Result<PresignOutcome, PresignError> {
        self.presign_existing(PresignKind::Get, input).await
    }

    /// Presign a delete of an existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, lookup, the existence check or
    /// signing fails.
    pub async fn presign_delete(
        &self,
        input: FilePresignInput,
    ) -> Result<PresignOutcome, PresignError> {
        self.presign_existing(PresignKind::Delete, input).await
    }

    /// Presign an upload of a new file.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, lookup or signing fails.
    pub async fn presign_upload(
        &self,
        input: UploadPresignInput,
    ) -> Result<PresignOutcome, PresignError> {
        if input.org_name.is_empty()
            || input.expires_in == 0
            || input.file_name.is_empty()
            || input.mime_type.is_empty()
            || input.purpose.is_empty()
        {
            return Err(PresignError::Validation(MISSING_UPLOAD_FIELDS.to_string()));
        }
        let ttl = self.ttl(input.expires_in)?;

        let lookup = UploadLookup {
            org_name: input.org_name,
            file_name: input.file_name,
            mime_type: input.mime_type,
            purpose: input.purpose,
            parent_entity_id: (input.parent_entity_id != 0).then_some(input.parent_entity_id),
        };

        let details = self.metadata.resolve_upload(&lookup).await.map_err(|e| {
            warn!(error = %e, org = %lookup.org_name, "Upload details lookup failed");
            PresignError::BadRequest(e.to_string())
        })?;

        if !details.has_coordinates() {
            return Err(PresignError::NotFound(UPLOAD_DETAILS_NOT_FOUND.to_string()));
        }

        let location = details.object_location();
        let presigned = self
            .storage
            .presign(PresignKind::Put.operation(), &location, ttl)
            .await
            .map_err(|e| PresignError::Internal(e.to_string()))?;

        info!(
            org = %lookup.org_name,
            purpose = %lookup.purpose,
            region = %location.region,
            bucket = %location.bucket,
            "Upload URL issued"
        );

        Ok(PresignOutcome {
            url: presigned.url,
            method: presigned.method,
            expires_at: presigned.expires_at,
            object_key: Some(location.object_key),
        })
    }

    /// Run whichever flow `request` asks for.
    ///
    /// # Errors
    ///
    /// Same as the flow dispatched to.
    pub async fn dispatch(&self, request: PresignRequest) -> Result<PresignOutcome, PresignError> {
        match request {
            PresignRequest::Download(input) => self.presign_download(input).await,
            PresignRequest::Delete(input) => self.presign_delete(input).await,
            PresignRequest::Upload(input) => self.presign_upload(input).await,
        }
    }

    async fn presign_existing(
        &self,
        kind: PresignKind,
        input: FilePresignInput,
    ) -> Result<PresignOutcome, PresignError> {
        let operation = kind.operation();
        if input.file_id == 0 || input.expires_in == 0 {
            return Err(PresignError::Validation(MISSING_FILE_FIELDS.to_string()));
        }
        let ttl = self.ttl(input.expires_in)?;

        let lookup = FileLookup {
            file_id: input.file_id,
            user_id: input.user_id,
        };

        let details = self.metadata.resolve_file(&lookup).await.map_err(|e| {
            warn!(error = %e, file_id = lookup.file_id, "File details lookup failed");
            PresignError::NotFound(e.to_string())
        })?;

        if details.file_id.unwrap_or(0) == 0 || !details.has_coordinates() {
            return Err(PresignError::NotFound(FILE_DETAILS_NOT_FOUND.to_string()));
        }

        let location = details.object_location();
        self.storage
            .object_exists(&location)
            .await
            .map_err(|e| PresignError::NotFound(e.to_string()))?;

        let presigned = self
            .storage
            .presign(operation, &location, ttl)
            .await
            .map_err(|e| PresignError::Internal(e.to_string()))?;

        info!(
            operation = %operation,
            file_id = lookup.file_id,
            region = %location.region,
            bucket = %location.bucket,
            "Presigned URL issued"
        );

        Ok(PresignOutcome {
            url: presigned.url,
            method: presigned.method,
            expires_at: presigned.expires_at,
            object_key: None,
        })
    }

    /// Convert a requested lifetime into a TTL within policy.
    fn ttl(&self, expires_in: i64) -> Result<Duration, PresignError> {
        u64::try_from(expires_in)
            .ok()
            .filter(|secs| (1..=self.policy.max_expires_in_secs).contains(secs))
            .map(Duration::from_secs)
            .ok_or_else(|| {
                PresignError::Validation(format!(
                    "expires_in must be between 1 and {} seconds",
                    self.policy.max_expires_in_secs
                ))
            })
    }

    /// Active policy.
    #[must_use]
    pub fn policy(&self) -> PresignPolicy {
        self.policy
    }
}
