//! REST client for the metadata backend.

use std::time::Duration;

use async_trait::async_trait;
use presigner_shared::MetadataSettings;
use reqwest::StatusCode;
use tracing::debug;

use super::error::MetadataError;
use super::types::{FileLocation, FileLookup, RpcPayload, UploadLookup};

const FILE_DETAILS_RPC: &str = "file_details";
const UPLOAD_DETAILS_RPC: &str = "file_upload_details";

/// Resolves logical lookups to storage coordinates.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Resolve an existing file.
    async fn resolve_file(&self, lookup: &FileLookup) -> Result<FileLocation, MetadataError>;

    /// Resolve where an upload should be written.
    async fn resolve_upload(&self, lookup: &UploadLookup) -> Result<FileLocation, MetadataError>;
}

/// Metadata client configuration.
#[derive(Clone)]
pub struct MetadataConfig {
    /// Base URL of the backend.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Schema selected via `Accept-Profile`/`Content-Profile`.
    pub schema: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Purposes accepted for uploads.
    pub allowed_purposes: Vec<String>,
}

impl MetadataConfig {
    /// Build from settings plus the upload purpose allow-list.
    #[must_use]
    pub fn from_settings(settings: &MetadataSettings, allowed_purposes: Vec<String>) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            schema: settings.schema.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            allowed_purposes,
        }
    }
}

/// HTTP client for the PostgREST-style metadata API.
pub struct MetadataClient {
    http: reqwest::Client,
    config: MetadataConfig,
}

impl MetadataClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: MetadataConfig) -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MetadataError::Configuration(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Check `purpose` against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidPurpose`] for unknown purposes.
    pub fn validate_purpose(&self, purpose: &str) -> Result<(), MetadataError> {
        if self.config.allowed_purposes.iter().any(|p| p == purpose) {
            Ok(())
        } else {
            Err(MetadataError::InvalidPurpose {
                purpose: purpose.to_string(),
                allowed: self.config.allowed_purposes.join(", "),
            })
        }
    }

    /// Perform an authenticated GET against `/rpc/{function}`.
    async fn call_rpc(
        &self,
        function: &str,
        context: &'static str,
        params: &[(&str, String)],
    ) -> Result<FileLocation, MetadataError> {
        let url = format!("{}/rpc/{function}", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .query(params)
            .header("Accept-Profile", &self.config.schema)
            .header("Content-Profile", &self.config.schema)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(MetadataError::Status {
                context,
                status: status.as_u16(),
                body,
            });
        }

        let payload: RpcPayload =
            serde_json::from_str(&body).map_err(|e| MetadataError::Decode {
                context,
                message: e.to_string(),
            })?;

        debug!(rpc = %function, "Metadata lookup succeeded");

        payload
            .into_first()
            .ok_or(MetadataError::NotFound { context })
    }
}

#[async_trait]
impl MetadataResolver for MetadataClient {
    async fn resolve_file(&self, lookup: &FileLookup) -> Result<FileLocation, MetadataError> {
        let mut params = vec![("file_id", lookup.file_id.to_string())];
        if let Some(user_id) = lookup.user_id.as_deref().filter(|u| !u.is_empty()) {
            params.push(("user_id", user_id.to_string()));
        }

        self.call_rpc(FILE_DETAILS_RPC, "file details", &params)
            .await
    }

    async fn resolve_upload(&self, lookup: &UploadLookup) -> Result<FileLocation, MetadataError> {
        self.validate_purpose(&lookup.purpose)?;

        let mut params = vec![
            ("org_name", lookup.org_name.clone()),
            ("file_name", lookup.file_name.clone()),
            ("mime_type", lookup.mime_type.clone()),
            ("purpose", lookup.purpose.clone()),
        ];
        if let Some(parent) = lookup.parent_entity_id {
            params.push(("parent_entity_id", parent.to_string()));
        }

        self.call_rpc(UPLOAD_DETAILS_RPC, "upload details", &params)
            .await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
