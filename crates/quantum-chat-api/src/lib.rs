//! HTTP chat endpoint that fronts an OpenAI-compatible completion service.
//!
//! [`handle`] decides every response from the request alone; [`ChatServer`]
//! only moves bytes between `tiny_http` and the handler.

pub mod classify;
pub mod config;
pub mod handler;
pub mod server;
pub mod upstream;
pub mod validate;

pub use classify::FailureClass;
pub use config::ProxyConfig;
pub use handler::{ApiRequest, ApiResponse, CORS_HEADERS, handle};
pub use server::ChatServer;
pub use upstream::{Completion, GroqUpstream, Upstream};
