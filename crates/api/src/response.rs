//! JSON response envelope.
//!
//! Every presign route answers with a flat object carrying `statusCode`
//! and either `url` (plus `expires_at`, and `object_key` for uploads) or
//! `error`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use presigner_core::presign::{PresignError, PresignOutcome};
use presigner_shared::AppError;
use serde::Serialize;
use tracing::{error, warn};

/// Successful presign response.
#[derive(Debug, Serialize)]
pub struct PresignResponse {
    /// Always 200.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Presigned URL.
    pub url: String,
    /// Expiry (RFC 3339).
    pub expires_at: String,
    /// Key the upload will land under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_key: Option<String>,
}

impl From<PresignOutcome> for PresignResponse {
    fn from(outcome: PresignOutcome) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            url: outcome.url,
            expires_at: outcome.expires_at.to_rfc3339(),
            object_key: outcome.object_key,
        }
    }
}

impl IntoResponse for PresignResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// HTTP status, repeated in the body.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Human readable message.
    pub error: String,
}

/// Error type returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<PresignError> for ApiError {
    fn from(err: PresignError) -> Self {
        Self(err.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self(AppError::Validation(format!("Invalid request body: {err}")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.0.error_code(), error = %self.0, "Request failed");
        } else {
            warn!(code = self.0.error_code(), error = %self.0, "Request rejected");
        }

        let body = ErrorBody {
            status_code: status.as_u16(),
            error: self.0.message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn test_success_envelope_omits_absent_object_key() {
        let response = PresignResponse::from(PresignOutcome {
            url: "https://example/x".to_string(),
            method: "GET".to_string(),
            expires_at: Utc::now(),
            object_key: None,
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["url"], "https://example/x");
        assert!(json.get("object_key").is_none());
        assert!(json["expires_at"].is_string());
    }

    #[tokio::test]
    async fn test_error_envelope_uses_plain_message() {
        let response =
            ApiError(AppError::NotFound("File details not found".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["error"], "File details not found");
    }

    #[tokio::test]
    async fn test_presign_error_status_mapping() {
        let cases = [
            (PresignError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (PresignError::BadRequest("b".into()), StatusCode::BAD_REQUEST),
            (PresignError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (
                PresignError::Internal("i".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
