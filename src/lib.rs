//! Credential-injecting proxy for SSML speech synthesis.
//!
//! Accepts `POST /cognitiveservices/v1` with an SSML body, forwards it to the
//! configured provider with the subscription key attached, and relays the
//! audio back.

// Core
pub mod config;
pub mod error;
pub mod http;
pub mod upstream;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
