//! Presign routes.
//!
//! `POST /presign/get`, `/presign/delete` and `/presign/put` run one flow
//! each; `POST /presign` picks the flow from the `operation` field.

use axum::{Router, body::Bytes, extract::State, routing::post};
use presigner_core::presign::{
    FilePresignInput, PresignKind, PresignRequest, UploadPresignInput,
};
use presigner_shared::AppError;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::AppState;
use crate::response::{ApiError, PresignResponse};

/// Creates the presign routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/presign",
            post(presign_dispatch).fallback(method_not_allowed),
        )
        .route(
            "/presign/get",
            post(presign_get).fallback(method_not_allowed),
        )
        .route(
            "/presign/delete",
            post(presign_delete).fallback(method_not_allowed),
        )
        .route(
            "/presign/put",
            post(presign_put).fallback(method_not_allowed),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Body for download and delete presigns. Missing fields decode as empty
/// and are reported by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilePresignRequest {
    /// Logical file id.
    pub file_id: i64,
    /// URL lifetime in seconds.
    pub expires_in: i64,
    /// Caller identity forwarded to the metadata backend.
    pub user_id: Option<String>,
}

impl From<FilePresignRequest> for FilePresignInput {
    fn from(req: FilePresignRequest) -> Self {
        Self {
            file_id: req.file_id,
            expires_in: req.expires_in,
            user_id: req.user_id,
        }
    }
}

/// Body for upload presigns.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UploadPresignRequest {
    /// Owning organization.
    pub org_name: String,
    /// URL lifetime in seconds.
    pub expires_in: i64,
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Upload purpose.
    pub purpose: String,
    /// Parent entity id, if any.
    pub parent_entity_id: Option<i64>,
}

impl From<UploadPresignRequest> for UploadPresignInput {
    fn from(req: UploadPresignRequest) -> Self {
        Self {
            org_name: req.org_name,
            expires_in: req.expires_in,
            file_name: req.file_name,
            mime_type: req.mime_type,
            purpose: req.purpose,
            parent_entity_id: req.parent_entity_id.unwrap_or(0),
        }
    }
}

/// Body for the dispatching route: the union of both shapes plus
/// `operation`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DispatchPresignRequest {
    /// `get`, `put` or `delete`.
    pub operation: Option<String>,
    /// Logical file id (get/delete).
    pub file_id: i64,
    /// URL lifetime in seconds.
    pub expires_in: i64,
    /// Caller identity (get/delete).
    pub user_id: Option<String>,
    /// Owning organization (put).
    pub org_name: String,
    /// Original file name (put).
    pub file_name: String,
    /// MIME type (put).
    pub mime_type: String,
    /// Upload purpose (put).
    pub purpose: String,
    /// Parent entity id (put).
    pub parent_entity_id: Option<i64>,
}

impl DispatchPresignRequest {
    /// Split into the typed request for its operation.
    fn into_request(self) -> Result<PresignRequest, AppError> {
        let kind = self
            .operation
            .as_deref()
            .and_then(|op| op.parse::<PresignKind>().ok())
            .ok_or_else(|| {
                AppError::Validation("Missing or invalid field: operation".to_string())
            })?;

        let file = FilePresignInput {
            file_id: self.file_id,
            expires_in: self.expires_in,
            user_id: self.user_id,
        };

        let request = match kind {
            PresignKind::Get => PresignRequest::Download(file),
            PresignKind::Delete => PresignRequest::Delete(file),
            PresignKind::Put => PresignRequest::Upload(UploadPresignInput {
                org_name: self.org_name,
                expires_in: self.expires_in,
                file_name: self.file_name,
                mime_type: self.mime_type,
                purpose: self.purpose,
                parent_entity_id: self.parent_entity_id.unwrap_or(0),
            }),
        };
        Ok(request)
    }
}

/// Decode a JSON body whatever its `Content-Type`. A `null` body decodes
/// as an empty request so validation reports the missing fields.
fn decode_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    let decoded: Option<T> = serde_json::from_slice(body)?;
    Ok(decoded.unwrap_or_default())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/presign/get`
async fn presign_get(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<PresignResponse, ApiError> {
    let body: FilePresignRequest = decode_body(&body)?;
    debug!(file_id = body.file_id, "Download presign requested");

    let outcome = state.presign.presign_download(body.into()).await?;
    Ok(outcome.into())
}

/// POST `/presign/delete`
async fn presign_delete(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<PresignResponse, ApiError> {
    let body: FilePresignRequest = decode_body(&body)?;
    debug!(file_id = body.file_id, "Delete presign requested");

    let outcome = state.presign.presign_delete(body.into()).await?;
    Ok(outcome.into())
}

/// POST `/presign/put`
async fn presign_put(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<PresignResponse, ApiError> {
    let body: UploadPresignRequest = decode_body(&body)?;
    debug!(org = %body.org_name, purpose = %body.purpose, "Upload presign requested");

    let outcome = state.presign.presign_upload(body.into()).await?;
    Ok(outcome.into())
}

/// POST `/presign`
async fn presign_dispatch(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<PresignResponse, ApiError> {
    let body: DispatchPresignRequest = decode_body(&body)?;
    let request = body.into_request()?;
    debug!(kind = ?request.kind(), "Dispatched presign requested");

    let outcome = state.presign.dispatch(request).await?;
    Ok(outcome.into())
}

/// Any non-POST method on a presign route.
async fn method_not_allowed() -> ApiError {
    ApiError(AppError::MethodNotAllowed)
}

#[cfg(test)]
#[path = "presign_tests.rs"]
mod tests;
