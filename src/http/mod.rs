//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → request.rs (raw body capture, size limit, output format header)
//!     → forward.rs (single upstream call)
//!     → response.rs (status + content-type/length + body relay)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use request::{SynthesisRequest, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
