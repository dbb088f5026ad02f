//! Inbound synthesis request extraction.
//!
//! # Responsibilities
//! - Capture the SSML body as raw bytes, never decoded
//! - Enforce the body size limit before anything is sent upstream
//! - Pick out the optional output format header; every other inbound header
//!   is dropped
//!
//! # Design Decisions
//! - A declared `Content-Length` over the limit is rejected without reading
//!   the body
//! - The caller's `Content-Type` is ignored; upstream always gets SSML

use axum::{
    body::{Body, Bytes},
    extract::FromRequest,
    http::{header::CONTENT_LENGTH, HeaderMap, HeaderValue, Request},
};

use crate::error::ProxyError;
use crate::http::server::AppState;
use crate::upstream::OUTPUT_FORMAT_HEADER;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// A validated synthesis request.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// SSML body exactly as received.
    pub body: Bytes,
    /// Value of `X-Microsoft-OutputFormat`, if the caller sent one.
    pub output_format: Option<HeaderValue>,
    /// Correlation ID assigned by the request ID layer.
    pub request_id: String,
}

/// Read the request ID set by `SetRequestIdLayer`.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

impl FromRequest<AppState> for SynthesisRequest {
    type Rejection = ProxyError;

    async fn from_request(request: Request<Body>, state: &AppState) -> Result<Self, Self::Rejection> {
        let limit = state.max_body_bytes;
        let (parts, body) = request.into_parts();

        if declared_length(&parts.headers).is_some_and(|len| len > limit) {
            return Err(ProxyError::PayloadTooLarge { limit });
        }

        let body = axum::body::to_bytes(body, limit).await.map_err(|err| {
            if std::error::Error::source(&err)
                .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
            {
                ProxyError::PayloadTooLarge { limit }
            } else {
                ProxyError::BodyRead(err.to_string())
            }
        })?;

        if body.is_empty() {
            return Err(ProxyError::EmptyBody);
        }

        Ok(Self {
            body,
            output_format: parts
                .headers
                .get(OUTPUT_FORMAT_HEADER)
                .filter(|v| !v.is_empty())
                .cloned(),
            request_id: request_id(&parts.headers),
        })
    }
}
