//! Speech provider client.
//!
//! # Responsibilities
//! - Hold the shared connection pool and timeouts
//! - Build the outbound request: credential, forced SSML content type,
//!   optional output format
//! - Buffer the provider's response for relay

use axum::body::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::logging::redact_key;

/// Credential header expected by the provider.
pub const SUBSCRIPTION_KEY_HEADER: HeaderName = HeaderName::from_static("ocp-apim-subscription-key");

/// Audio encoding selector, forwarded verbatim when the caller sets it.
pub const OUTPUT_FORMAT_HEADER: HeaderName = HeaderName::from_static("x-microsoft-outputformat");

/// Content type the provider expects for SSML bodies.
pub const SSML_CONTENT_TYPE: &str = "application/ssml+xml";

/// Error building the upstream client.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("subscription key is not a valid header value")]
    InvalidKey,
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Buffered provider response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Client for the provider's synthesis route.
///
/// Cheap to share: the inner `reqwest::Client` is reference counted and the
/// rest is immutable.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    synthesis_url: Url,
    key: HeaderValue,
}

impl UpstreamClient {
    /// Create a new client from validated upstream settings.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let mut key = HeaderValue::from_str(config.key.expose_secret())
            .map_err(|_| ClientBuildError::InvalidKey)?;
        key.set_sensitive(true);

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .tcp_nodelay(true)
            .build()?;

        tracing::info!(
            url = %config.synthesis_url,
            key = %redact_key(config.key.expose_secret()),
            connect_timeout = ?config.connect_timeout,
            request_timeout = ?config.request_timeout,
            "Upstream client initialized"
        );

        Ok(Self {
            client,
            synthesis_url: config.synthesis_url.clone(),
            key,
        })
    }

    /// The full synthesis URL requests are sent to.
    pub fn synthesis_url(&self) -> &Url {
        &self.synthesis_url
    }

    /// Headers for one outbound synthesis call.
    pub fn request_headers(&self, output_format: Option<&HeaderValue>) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(SUBSCRIPTION_KEY_HEADER, self.key.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SSML_CONTENT_TYPE));
        if let Some(format) = output_format {
            headers.insert(OUTPUT_FORMAT_HEADER, format.clone());
        }
        headers
    }

    /// POST `body` to the provider and buffer the reply.
    ///
    /// Any status is returned as `Ok`; only transport failures are errors.
    pub async fn synthesize(
        &self,
        body: Bytes,
        output_format: Option<&HeaderValue>,
    ) -> Result<UpstreamResponse, reqwest::Error> {
        let response = self
            .client
            .post(self.synthesis_url.clone())
            .headers(self.request_headers(output_format))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("synthesis_url", &self.synthesis_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;

    fn test_client() -> UpstreamClient {
        let config = UpstreamConfig {
            synthesis_url: "http://127.0.0.1:9/cognitiveservices/v1".parse().unwrap(),
            key: SecretString::from("test-subscription-key"),
            connect_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(1),
        };
        UpstreamClient::new(&config).unwrap()
    }

    #[test]
    fn test_request_headers_without_format() {
        let headers = test_client().request_headers(None);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[CONTENT_TYPE], SSML_CONTENT_TYPE);
        assert_eq!(headers[SUBSCRIPTION_KEY_HEADER], "test-subscription-key");
        assert!(headers[SUBSCRIPTION_KEY_HEADER].is_sensitive());
        assert!(!headers.contains_key(OUTPUT_FORMAT_HEADER));
    }

    #[test]
    fn test_request_headers_with_format() {
        let format = HeaderValue::from_static("audio-16khz-128kbitrate-mono-mp3");
        let headers = test_client().request_headers(Some(&format));
        assert_eq!(headers[OUTPUT_FORMAT_HEADER], "audio-16khz-128kbitrate-mono-mp3");
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", test_client());
        assert!(!debug.contains("test-subscription-key"));
    }

    #[test]
    fn test_rejects_key_with_newline() {
        let config = UpstreamConfig {
            synthesis_url: "http://127.0.0.1:9/cognitiveservices/v1".parse().unwrap(),
            key: SecretString::from("bad\nkey"),
            connect_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            UpstreamClient::new(&config),
            Err(ClientBuildError::InvalidKey)
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        // Port 9 (discard) is not listening on loopback in test environments.
        let result = test_client()
            .synthesize(Bytes::from_static(b"<speak/>"), None)
            .await;
        assert!(result.is_err());
    }
}
