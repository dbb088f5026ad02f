//! Synthesis forwarding handler.
//!
//! Validate, forward once, relay. Each request is independent; the only
//! await points are the upstream call and reading its body. If the caller
//! disconnects, axum drops this future and the upstream call with it.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::error::ProxyError;
use crate::http::request::SynthesisRequest;
use crate::http::response::relay;
use crate::http::server::AppState;
use crate::observability::metrics::{self, Outcome};

/// Longest upstream error text copied into a log line.
const ERROR_PREVIEW_CHARS: usize = 512;

/// `POST /cognitiveservices/v1`
pub async fn synthesize(
    State(state): State<AppState>,
    request: Result<SynthesisRequest, ProxyError>,
) -> Response {
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected synthesis request");
            metrics::record_request(Outcome::ClientError, e.status().as_u16());
            return e.into_response();
        }
    };

    let request_id = request.request_id;
    let output_format = request.output_format;

    tracing::debug!(
        request_id = %request_id,
        body_bytes = request.body.len(),
        output_format = ?output_format,
        "Forwarding synthesis request"
    );
    metrics::record_request_bytes(request.body.len());

    let start = Instant::now();
    let upstream = match state
        .upstream
        .synthesize(request.body, output_format.as_ref())
        .await
    {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                url = %state.upstream.synthesis_url(),
                error = %e,
                "Upstream request failed"
            );
            let err = ProxyError::from(e);
            metrics::record_request(Outcome::ProxyError, err.status().as_u16());
            return err.into_response();
        }
    };
    metrics::record_upstream_duration(start);

    let status = upstream.status;
    if status.is_success() {
        tracing::debug!(
            request_id = %request_id,
            status = %status,
            audio_bytes = upstream.body.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Synthesis complete"
        );
        metrics::record_request(Outcome::Success, status.as_u16());
    } else {
        let text = String::from_utf8_lossy(&upstream.body);
        let preview: String = text.chars().take(ERROR_PREVIEW_CHARS).collect();
        tracing::warn!(
            request_id = %request_id,
            status = %status,
            error = %preview,
            "Upstream returned error status"
        );
        metrics::record_request(Outcome::UpstreamError, status.as_u16());
    }

    relay(upstream)
}
