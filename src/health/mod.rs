//! Liveness endpoint.
//!
//! Answers from the proxy itself; never contacts the provider.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

/// `GET /`
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        message: "TTS proxy is running",
    })
}
