//! Error types for the quantum terminal.

use std::io;

/// Errors produced by the interpreter, the assistant bridge and the chat API.
#[derive(Debug, thiserror::Error)]
pub enum QuantumError {
    /// A command rejected its input. The message is shown to the user as-is.
    #[error("{0}")]
    Command(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("fs error: {0}")]
    Fs(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, QuantumError>;
