//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use secrecy::SecretString;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use tts_proxy::config::{ProxyConfig, UpstreamConfig, SYNTHESIS_PATH};
use tts_proxy::{HttpServer, Shutdown};

pub const TEST_KEY: &str = "super-secret-subscription-key-0123456789";

/// A request as observed by the mock provider.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What the mock provider answers with.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl MockReply {
    pub fn audio(body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: vec![
                ("content-type", "audio/mpeg"),
                ("x-ms-region", "westeurope"),
                ("apim-request-id", "5f1e2c3a"),
            ],
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn error(status: StatusCode, text: &str) -> Self {
        Self {
            status,
            headers: vec![("x-ms-region", "westeurope")],
            body: text.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

/// Handle to a running mock provider.
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub fn endpoint(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

async fn mock_synthesize(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.calls.lock().unwrap().push(Recorded { headers, body });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    let mut response_headers = HeaderMap::new();
    for &(name, value) in &state.reply.headers {
        response_headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    (state.reply.status, response_headers, state.reply.body.clone())
}

/// Start a mock provider that serves `reply` on the synthesis route.
pub async fn start_mock_upstream(reply: MockReply) -> MockUpstream {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        calls: calls.clone(),
    };
    let app = Router::new()
        .route(SYNTHESIS_PATH, post(mock_synthesize))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, calls }
}

/// An address with nothing listening on it.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Handle to a running proxy.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn upstream_config(endpoint: &str, request_timeout: Duration) -> UpstreamConfig {
    let mut config = ProxyConfig::default();
    config.upstream.endpoint = Some(endpoint.to_string());
    config.upstream.key = Some(SecretString::from(TEST_KEY));
    let mut upstream = tts_proxy::config::validation::validate_config(&config).unwrap();
    upstream.request_timeout = request_timeout;
    upstream
}

/// Start the proxy in front of `endpoint`.
pub async fn start_proxy(endpoint: &str, max_body_bytes: usize) -> TestProxy {
    start_proxy_with_timeout(endpoint, max_body_bytes, Duration::from_secs(10)).await
}

pub async fn start_proxy_with_timeout(
    endpoint: &str,
    max_body_bytes: usize,
    request_timeout: Duration,
) -> TestProxy {
    let mut config = ProxyConfig::default();
    config.limits.max_body_bytes = max_body_bytes;
    let upstream = upstream_config(endpoint, request_timeout);

    let server = HttpServer::new(config, &upstream).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub const SSML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xml:lang="en-US">
  <voice name="en-US-JennyNeural">  Hello,   world! </voice>
</speak>
"#;
