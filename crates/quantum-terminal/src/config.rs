//! Terminal configuration loaded from `quantum.toml`.
//!
//! Every field is optional; a missing file section or key falls back to the
//! stock portfolio values.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use quantum_types::{QuantumError, Result};

/// Top-level terminal configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Login name shown by `whoami` and the prompt.
    pub user: String,
    /// Host name shown by `whoami`.
    pub host: String,
    /// Home directory; the session starts here.
    pub home: String,
    /// Display name of the remote assistant persona.
    pub assistant_name: String,
    /// Human contact address used in assistant fallback messages.
    pub contact_email: String,
    /// Origin of the page hosting the terminal (drives endpoint choice).
    pub origin: String,
    /// Same-origin path of the chat endpoint.
    pub api_path: String,
    /// Absolute chat endpoint used from local-development hosts.
    pub fallback_api_url: String,
    /// Public site mentioned when a local-development host cannot reach the API.
    pub live_site_url: String,
    /// Transport timeout for one assistant request.
    pub request_timeout_secs: u64,
    /// Duration of the cosmetic matrix effect.
    pub matrix_effect_secs: u64,
    pub typewriter: TypewriterConfig,
}

/// Line-by-line reveal timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub welcome_delay_ms: u64,
    pub entry_delay_ms: u64,
    pub line_delay_ms: u64,
}

const LIVE_SITE: &str = "https://ahraz-website3-a03aihfs2-razas-projects-0ef26892.vercel.app";

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            user: "ahraz".to_string(),
            host: "3d-terminal".to_string(),
            home: "/home/ahraz".to_string(),
            assistant_name: "AhrazOmatic9000".to_string(),
            contact_email: "ahrazkibria@torontomu.ca".to_string(),
            origin: "http://localhost".to_string(),
            api_path: "/api/chat".to_string(),
            fallback_api_url: format!("{LIVE_SITE}/api/chat"),
            live_site_url: LIVE_SITE.to_string(),
            request_timeout_secs: 30,
            matrix_effect_secs: 5,
            typewriter: TypewriterConfig::default(),
        }
    }
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            welcome_delay_ms: 500,
            entry_delay_ms: 100,
            line_delay_ms: 80,
        }
    }
}

impl TerminalConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| QuantumError::Config(format!("quantum.toml: {e}")))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn matrix_duration(&self) -> Duration {
        Duration::from_secs(self.matrix_effect_secs)
    }
}
