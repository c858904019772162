//! JSON envelope for responses produced by tower layers.
//!
//! The timeout and body limit layers answer with bare text bodies; these
//! are rewritten into the same JSON error body the handlers use.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use presigner_shared::AppError;

use crate::response::ApiError;

/// Rewrites 408 and 413 responses into the JSON error envelope.
pub async fn error_envelope(response: Response) -> Response {
    match response.status() {
        StatusCode::REQUEST_TIMEOUT => ApiError(AppError::Timeout).into_response(),
        StatusCode::PAYLOAD_TOO_LARGE => ApiError(AppError::PayloadTooLarge).into_response(),
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{Router, body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::{ServiceBuilder, ServiceExt};
    use tower_http::timeout::TimeoutLayer;

    use super::*;

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_millis(500)).await;
        "done"
    }

    async fn fast() -> &'static str {
        "done"
    }

    async fn too_large() -> (StatusCode, &'static str) {
        (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded")
    }

    fn app() -> Router {
        Router::new()
            .route("/slow", get(slow))
            .route("/fast", get(fast))
            .route("/too-large", get(too_large))
            .layer(
                ServiceBuilder::new()
                    .layer(axum::middleware::map_response(error_envelope))
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        Duration::from_millis(20),
                    )),
            )
    }

    async fn get_path(path: &str) -> Response {
        app()
            .oneshot(
                Request::builder()
                    .uri(path)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response")
    }

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
    async fn test_timeout_uses_json_envelope() {
        let response = get_path("/slow").await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let json = body_json(response).await;
        assert_eq!(json["statusCode"], 408);
        assert_eq!(json["error"], "Request timed out");
    }

    #[tokio::test]
    async fn test_payload_too_large_uses_json_envelope() {
        let response = get_path("/too-large").await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["statusCode"], 413);
        assert_eq!(json["error"], "Request body too large");
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let response = get_path("/fast").await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        assert_eq!(&bytes[..], b"done");
    }
}
