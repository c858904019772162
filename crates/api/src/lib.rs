//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - Presign routes, one per operation plus a dispatching route
//! - Request logging middleware and the JSON error envelope for layer responses
//! - The JSON response envelope

pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use presigner_core::presign::PresignService;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Presign orchestration service.
    pub presign: Arc<PresignService>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl AppState {
    /// Create state with the default 15 second request timeout.
    #[must_use]
    pub fn new(presign: Arc<PresignService>) -> Self {
        Self {
            presign,
            request_timeout: Duration::from_secs(15),
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let timeout = state.request_timeout;

    // The body limit sits on the router so its 413 reaches the envelope
    // with an axum body.
    Router::new()
        .merge(routes::api_routes())
        .layer(axum::middleware::from_fn(middleware::request_log))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(axum::middleware::map_response(middleware::error_envelope))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    timeout,
                )),
        )
        .with_state(state)
}
