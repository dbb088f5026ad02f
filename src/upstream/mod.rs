//! Upstream speech provider.
//!
//! # Data Flow
//! ```text
//! SynthesisRequest (raw SSML bytes, optional output format)
//!     → client.rs (credential + SSML content type injected)
//!     → POST {endpoint}/cognitiveservices/v1
//!     → UpstreamResponse (status, headers, body) back to the handler
//! ```
//!
//! # Design Decisions
//! - One pooled client for the whole process
//! - Every call is bounded by connect and total timeouts
//! - No retries: each inbound request produces exactly one outbound call

pub mod client;

pub use client::{
    ClientBuildError, UpstreamClient, UpstreamResponse, OUTPUT_FORMAT_HEADER, SSML_CONTENT_TYPE,
    SUBSCRIPTION_KEY_HEADER,
};
