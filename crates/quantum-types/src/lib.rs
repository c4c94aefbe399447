//! Foundation types for the quantum terminal.
//!
//! Shared by every crate in the workspace: the error enum and the
//! platform-agnostic key events the interpreter consumes.

pub mod error;
pub mod input;

pub use error::{QuantumError, Result};
pub use input::KeyEvent;
