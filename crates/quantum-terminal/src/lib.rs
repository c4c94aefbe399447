//! Command interpreter behind the quantum portfolio terminal.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name in a fixed order. The
//! [`Terminal`] controller owns the transcript, the history and the edit
//! buffer, resolves submitted lines through the registry, and hands the one
//! asynchronous command (`ai`) to a background assistant worker whose result
//! later replaces a pending transcript entry by its stable id.

pub mod assistant;
pub mod calc;
mod commands;
pub mod config;
pub mod effects;
mod fun_commands;
pub mod fs;
pub mod history;
pub mod input;
mod interpreter;
mod portfolio_commands;
mod system_commands;
mod terminal;
pub mod transcript;
pub mod worker;

/// Assistant bridge types (transport seam, outcome, endpoint resolution).
pub use assistant::{
    Assistant, AssistantOutcome, AssistantTransport, Endpoint, HttpTransport, TransportResponse,
};
/// Register every built-in command into a registry, in display order.
pub use commands::register_builtins;
/// Terminal configuration loaded from TOML.
pub use config::TerminalConfig;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text or an out-of-band signal).
pub use interpreter::CommandOutput;
/// Insertion-ordered registry of commands.
pub use interpreter::CommandRegistry;
/// Per-invocation environment passed to every command.
pub use interpreter::Environment;
/// Resolve a possibly-relative path against a working directory.
pub use interpreter::resolve_path;
/// Split a line into a lower-cased command name and arguments.
pub use interpreter::tokenize;
pub use quantum_types::{KeyEvent, QuantumError, Result};
/// The top-level terminal controller.
pub use terminal::{KeyOutcome, Terminal};
/// Transcript entry types.
pub use transcript::{EntryId, EntryKind, OutputEntry, Transcript};
