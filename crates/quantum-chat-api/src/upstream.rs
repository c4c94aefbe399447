//! Completion providers.

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use quantum_types::{QuantumError, Result};

use crate::config::ProxyConfig;

/// A finished completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub tokens_used: u64,
}

/// Something that turns a user prompt into a reply.
///
/// `Err(QuantumError::Upstream(msg))` carries the provider's own error
/// message so it can be classified.
pub trait Upstream: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<Completion>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

const GENERIC_FAILURE: &str = "AI service error";

/// OpenAI-compatible chat completions client (Groq by default).
pub struct GroqUpstream {
    client: Client,
    url: String,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
    api_key: Option<String>,
}

impl GroqUpstream {
    /// Build from config, reading the key from the configured variable.
    pub fn from_config(config: &ProxyConfig) -> Result<Self> {
        Self::with_key(config, config.api_key())
    }

    pub fn with_key(config: &ProxyConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| QuantumError::Transport(format!("http client: {e}")))?;
        Ok(Self {
            client,
            url: config.upstream_url.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            api_key,
        })
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Upstream for GroqUpstream {
    fn complete(&self, prompt: &str) -> Result<Completion> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| QuantumError::Upstream("API key not configured".into()))?;
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(key)
            .json(&request)
            .send()
            .map_err(|e| QuantumError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| QuantumError::Transport(format!("reading body: {e}")))?;
        debug!("upstream replied {status} ({} bytes)", body.len());

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            return Err(QuantumError::Upstream(message));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| QuantumError::Upstream(GENERIC_FAILURE.into()))?;
        Ok(Completion {
            text,
            tokens_used: parsed.usage.map_or(0, |u| u.total_tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let req = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
            max_tokens: 250,
            temperature: 0.5,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "m");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "hi");
        assert_eq!(v["max_tokens"], 250);
        assert_eq!(v["temperature"], 0.5);
    }

    #[test]
    fn usage_is_optional() {
        let r: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"yo"}}]}"#).unwrap();
        assert!(r.usage.is_none());
        assert_eq!(r.choices[0].message.content, "yo");
    }

    #[test]
    fn missing_key_fails_without_network() {
        let up = GroqUpstream::with_key(&ProxyConfig::default(), None).unwrap();
        assert!(!up.has_key());
        let err = up.complete("hello").unwrap_err();
        assert!(matches!(err, QuantumError::Upstream(_)));
    }
}
