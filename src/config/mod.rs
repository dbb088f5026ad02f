//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (AZURE_ENDPOINT, AZURE_KEY, PORT, LOG_LEVEL)
//!     → validation.rs (semantic checks)
//!     → UpstreamConfig (validated, immutable)
//!     → shared via Arc with the forwarding handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields except the upstream endpoint and key have defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CorsConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    TimeoutConfig, UpstreamSettings,
};
pub use validation::{UpstreamConfig, ValidationError, SYNTHESIS_PATH};
