//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tts_proxy_requests_total` (counter): synthesis requests by outcome, status
//! - `tts_proxy_upstream_duration_seconds` (histogram): upstream call latency
//! - `tts_proxy_request_bytes` (histogram): accepted SSML body sizes
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus
//! recorder.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// How a synthesis request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Upstream answered with a success status.
    Success,
    /// Upstream answered with an error status that was relayed.
    UpstreamError,
    /// Rejected before contacting upstream.
    ClientError,
    /// Upstream unreachable or the proxy failed.
    ProxyError,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::UpstreamError => "upstream_error",
            Outcome::ClientError => "client_error",
            Outcome::ProxyError => "proxy_error",
        }
    }
}

/// Install the Prometheus recorder and start its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished synthesis request.
pub fn record_request(outcome: Outcome, status: u16) {
    counter!(
        "tts_proxy_requests_total",
        "outcome" => outcome.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the latency of an upstream call started at `start`.
pub fn record_upstream_duration(start: Instant) {
    histogram!("tts_proxy_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the size of an accepted SSML body.
pub fn record_request_bytes(len: usize) {
    histogram!("tts_proxy_request_bytes").record(len as f64);
}
