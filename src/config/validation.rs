//! Configuration validation.
//!
//! Semantic checks run after parsing and the environment overlay. Every
//! problem is collected so the operator sees all of them at once. On success
//! the raw settings are turned into [`UpstreamConfig`], the immutable value
//! the forwarding handler is built from.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

use crate::config::schema::ProxyConfig;

/// Fixed provider route appended to the configured endpoint.
pub const SYNTHESIS_PATH: &str = "/cognitiveservices/v1";

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("AZURE_ENDPOINT is not set")]
    MissingEndpoint,
    #[error("AZURE_ENDPOINT '{0}' is not a valid http(s) URL")]
    InvalidEndpoint(String),
    #[error("AZURE_KEY is not set")]
    MissingKey,
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("upstream.request_timeout_secs ({upstream}) must be less than timeouts.request_secs ({request})")]
    UpstreamTimeoutTooLong { upstream: u64, request: u64 },
}

/// Validated, immutable upstream settings.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Full synthesis URL: endpoint without trailing slash + [`SYNTHESIS_PATH`].
    pub synthesis_url: Url,
    pub key: SecretString,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

/// Build the synthesis URL from a provider base endpoint.
pub fn synthesis_url(endpoint: &str) -> Result<Url, ValidationError> {
    let base = endpoint.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{base}{SYNTHESIS_PATH}"))
        .map_err(|_| ValidationError::InvalidEndpoint(endpoint.to_string()))?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ValidationError::InvalidEndpoint(endpoint.to_string())),
    }
}

/// Validate the configuration, returning the upstream settings on success.
pub fn validate_config(config: &ProxyConfig) -> Result<UpstreamConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let url = match config.upstream.endpoint.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(ValidationError::MissingEndpoint);
            None
        }
        Some(endpoint) => synthesis_url(endpoint).map_err(|e| errors.push(e)).ok(),
    };

    let key = config
        .upstream
        .key
        .clone()
        .filter(|k| !k.expose_secret().trim().is_empty());
    if key.is_none() {
        errors.push(ValidationError::MissingKey);
    }

    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("upstream.connect_timeout_secs"));
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("upstream.request_timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }

    // The upstream call must give up before the inbound TimeoutLayer does.
    let upstream_secs = config.upstream.request_timeout_secs;
    let request_secs = config.timeouts.request_secs;
    if upstream_secs > 0 && request_secs > 0 && upstream_secs >= request_secs {
        errors.push(ValidationError::UpstreamTimeoutTooLong {
            upstream: upstream_secs,
            request: request_secs,
        });
    }

    match (url, key) {
        (Some(synthesis_url), Some(key)) if errors.is_empty() => Ok(UpstreamConfig {
            synthesis_url,
            key,
            connect_timeout: Duration::from_secs(config.upstream.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.upstream.request_timeout_secs),
        }),
        _ => Err(errors),
    }
}
