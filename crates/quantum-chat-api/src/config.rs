//! Proxy configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use quantum_types::{QuantumError, Result};

/// Settings for the chat endpoint and its upstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Socket address the server listens on.
    pub bind: String,
    /// Path of the chat route.
    pub route: String,
    /// OpenAI-compatible chat completions URL.
    pub upstream_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Longest accepted prompt, in characters.
    pub max_prompt_chars: usize,
    /// Words that get a prompt rejected (matched case-insensitively).
    pub blocked_words: Vec<String>,
    /// Name used in user-facing error messages.
    pub persona_name: String,
    pub system_prompt: String,
    /// Environment variable holding the upstream bearer key.
    pub api_key_env: String,
    pub request_timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3001".to_string(),
            route: "/api/chat".to_string(),
            upstream_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            max_tokens: 250,
            temperature: 0.8,
            max_prompt_chars: 500,
            blocked_words: vec!["hack".into(), "attack".into(), "spam".into()],
            persona_name: "AhrazOmatic9000".to_string(),
            system_prompt: "You are AhrazOmatic9000, Ahraz Kibria's witty personal AI \
                            assistant embedded in his 3D portfolio terminal. Answer \
                            questions about Ahraz's projects, skills and experience in a \
                            short, playful, terminal-friendly way."
                .to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ProxyConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| QuantumError::Config(format!("chat-api.toml: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The upstream key, if the configured variable is set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = ProxyConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ProxyConfig::default());
        assert_eq!(cfg.max_prompt_chars, 500);
        assert_eq!(cfg.max_tokens, 250);
        assert_eq!(cfg.blocked_words, ["hack", "attack", "spam"]);
    }

    #[test]
    fn override_some_fields() {
        let cfg = ProxyConfig::from_toml_str(
            r#"
            bind = "0.0.0.0:8080"
            blocked_words = ["foo"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:8080");
        assert_eq!(cfg.blocked_words, ["foo"]);
        assert_eq!(cfg.route, "/api/chat");
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = ProxyConfig::from_toml_str("max_tokens = \"lots\"").unwrap_err();
        assert!(matches!(err, QuantumError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "temperature = 0.2").unwrap();
        let cfg = ProxyConfig::load(file.path()).unwrap();
        assert!((cfg.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_key_variable_is_none() {
        let cfg = ProxyConfig {
            api_key_env: "QUANTUM_CHAT_API_TEST_UNSET_KEY".into(),
            ..ProxyConfig::default()
        };
        assert_eq!(cfg.api_key(), None);
    }
}
