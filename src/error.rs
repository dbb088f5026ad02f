//! Per-request errors and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure while handling a single synthesis request.
///
/// Upstream error statuses are not represented here: they are relayed to the
/// caller as ordinary responses.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("request body is empty")]
    EmptyBody,
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    BodyRead(String),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// JSON error body returned to callers.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub details: String,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::EmptyBody | ProxyError::BodyRead(_) => StatusCode::BAD_REQUEST,
            ProxyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code used in the JSON body.
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::EmptyBody => "empty_body",
            ProxyError::PayloadTooLarge { .. } => "payload_too_large",
            ProxyError::BodyRead(_) => "bad_request",
            ProxyError::Upstream(_) => "proxy_error",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code(),
            details: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
