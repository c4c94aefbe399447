//! Remote assistant bridge.
//!
//! One `ask` performs at most one POST of `{ "prompt": ... }` to the chat
//! endpoint and turns whatever comes back into display text. Failures never
//! escape as errors: they resolve to [`AssistantOutcome::Failed`] carrying a
//! persona-flavoured fallback, and the dispatcher renders that as an error
//! entry.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use url::{Host, Url};

use quantum_types::{QuantumError, Result};

use crate::config::TerminalConfig;

/// Raw HTTP response as seen by the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound JSON transport. `Err` means no response was received at all.
pub trait AssistantTransport: Send + Sync {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<TransportResponse>;
}

/// `reqwest` blocking transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuantumError::Transport(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

impl AssistantTransport for HttpTransport {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<TransportResponse> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| QuantumError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| QuantumError::Transport(format!("reading body: {e}")))?;
        Ok(TransportResponse { status, body })
    }
}

/// Where chat requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
    local: bool,
}

impl Endpoint {
    /// Pick the chat URL for a page served from `origin`.
    ///
    /// Local-development hosts (`localhost`, `127.0.0.1`, `::1`) use the
    /// absolute fallback URL; any other origin gets `relative_path` joined
    /// onto it.
    pub fn resolve(origin: &str, relative_path: &str, fallback_url: &str) -> Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| QuantumError::Config(format!("invalid origin '{origin}': {e}")))?;
        let local = match origin.host() {
            Some(Host::Domain(d)) => d.eq_ignore_ascii_case("localhost"),
            Some(Host::Ipv4(ip)) => ip == Ipv4Addr::LOCALHOST,
            Some(Host::Ipv6(ip)) => ip == Ipv6Addr::LOCALHOST,
            None => false,
        };
        let url = if local {
            Url::parse(fallback_url)
                .map_err(|e| QuantumError::Config(format!("invalid fallback url: {e}")))?
        } else {
            origin
                .join(relative_path)
                .map_err(|e| QuantumError::Config(format!("invalid api path: {e}")))?
        };
        Ok(Self {
            url: url.into(),
            local,
        })
    }

    /// An endpoint used as-is (tests, explicit overrides).
    pub fn fixed(url: impl Into<String>, local: bool) -> Self {
        Self {
            url: url.into(),
            local,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the page origin is a local-development host.
    pub fn is_local(&self) -> bool {
        self.local
    }
}

/// Resolved value of one `ask`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantOutcome {
    /// Text to show as the assistant's reply.
    Answered(String),
    /// Transport failure; text to show as an error.
    Failed(String),
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: Option<String>,
    #[serde(rename = "tokensUsed")]
    tokens_used: Option<u64>,
    error: Option<String>,
}

/// The assistant persona and its endpoint.
pub struct Assistant {
    transport: Arc<dyn AssistantTransport>,
    endpoint: Endpoint,
    name: String,
    contact_email: String,
    live_site_url: String,
}

impl Assistant {
    pub fn new(
        transport: Arc<dyn AssistantTransport>,
        endpoint: Endpoint,
        config: &TerminalConfig,
    ) -> Self {
        Self {
            transport,
            endpoint,
            name: config.assistant_name.clone(),
            contact_email: config.contact_email.clone(),
            live_site_url: config.live_site_url.clone(),
        }
    }

    /// Build the stock HTTP-backed assistant from configuration.
    pub fn from_config(config: &TerminalConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout())?;
        let endpoint =
            Endpoint::resolve(&config.origin, &config.api_path, &config.fallback_api_url)?;
        Ok(Self::new(Arc::new(transport), endpoint, config))
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Persona tag prefixed to every message.
    pub fn tag(&self) -> String {
        format!("🤖 {}:", self.name)
    }

    /// Text of the in-progress placeholder.
    pub fn pending_text(&self) -> String {
        format!("{} Thinking...", self.tag())
    }

    /// Canned reply for an empty prompt.
    pub fn usage(&self) -> String {
        format!(
            "{} Hey there! I'm Ahraz's personal AI assistant living in this 3D terminal!\n\
             \n\
             Ask me anything about:\n\
             • Ahraz's projects (4Sight, BIOsync, StreamFlix, etc.)\n\
             • His technical skills and experience\n\
             • How to contact him\n\
             • Programming and tech questions\n\
             • Random fun stuff!\n\
             \n\
             Usage: ai - what programming languages does Ahraz know?\n       \
             ai - tell me about 4Sight\n       \
             ai - how can I contact Ahraz?\n       \
             ai - what's the meaning of life?",
            self.tag()
        )
    }

    /// Fallback shown when no usable response arrived.
    pub fn fallback(&self) -> String {
        if self.endpoint.local {
            format!(
                "{} Localhost can't reach the live API! 🔧\n\n\
                 🌐 For full AI functionality, visit:\n{}\n\n\
                 Or contact Ahraz directly: {} 📧",
                self.tag(),
                self.live_site_url,
                self.contact_email
            )
        } else {
            format!(
                "{} Oops! I'm having technical difficulties! 🔧\n\
                 Maybe try again later or contact Ahraz directly at {} 📧\n\n\
                 Error: Network connection issue",
                self.tag(),
                self.contact_email
            )
        }
    }

    /// Ask the remote assistant. Exactly one attempt.
    pub fn ask(&self, prompt: &str) -> AssistantOutcome {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return AssistantOutcome::Answered(self.usage());
        }

        debug!("assistant request to {} ({} chars)", self.endpoint.url, prompt.chars().count());
        let resp = match self
            .transport
            .post_json(&self.endpoint.url, &json!({ "prompt": prompt }))
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!("assistant transport failed: {e}");
                return AssistantOutcome::Failed(self.fallback());
            },
        };

        let reply: ChatReply = match serde_json::from_str(&resp.body) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("assistant returned undecodable body (status {}): {e}", resp.status);
                return AssistantOutcome::Failed(self.fallback());
            },
        };

        if !resp.is_success() {
            let message = reply.error.unwrap_or_else(|| format!("HTTP {}", resp.status));
            warn!("assistant endpoint answered {}: {message}", resp.status);
            return AssistantOutcome::Answered(format!("{} {message}", self.tag()));
        }

        let tokens = match reply.tokens_used {
            Some(n) if n > 0 => n.to_string(),
            _ => "unknown".to_string(),
        };
        let note = if self.endpoint.local {
            "\n💡 (Powered by live API from localhost)"
        } else {
            ""
        };
        AssistantOutcome::Answered(format!(
            "{} {}\n\n💡 Tokens used: {tokens}{note}",
            self.tag(),
            reply.response.unwrap_or_default()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Canned {
        result: Mutex<Option<Result<TransportResponse>>>,
        seen: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl Canned {
        fn new(result: Result<TransportResponse>) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(result)),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn ok(status: u16, body: &str) -> Arc<Self> {
            Self::new(Ok(TransportResponse {
                status,
                body: body.to_string(),
            }))
        }
    }

    impl AssistantTransport for Canned {
        fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<TransportResponse> {
            self.seen.lock().unwrap().push((url.to_string(), body.clone()));
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(QuantumError::Transport("called twice".into())))
        }
    }

    fn assistant(transport: Arc<Canned>, local: bool) -> Assistant {
        Assistant::new(
            transport,
            Endpoint::fixed("http://api.test/api/chat", local),
            &TerminalConfig::default(),
        )
    }

    #[test]
    fn resolve_localhost_uses_fallback() {
        for origin in ["http://localhost:3000", "http://127.0.0.1", "http://[::1]:8080"] {
            let ep = Endpoint::resolve(origin, "/api/chat", "https://live.example/api/chat").unwrap();
            assert_eq!(ep.url(), "https://live.example/api/chat", "{origin}");
            assert!(ep.is_local());
        }
    }

    #[test]
    fn resolve_other_origin_uses_relative_path() {
        let ep = Endpoint::resolve("https://ahraz.dev/terminal", "/api/chat", "https://x/api").unwrap();
        assert_eq!(ep.url(), "https://ahraz.dev/api/chat");
        assert!(!ep.is_local());
    }

    #[test]
    fn resolve_rejects_bad_origin() {
        assert!(matches!(
            Endpoint::resolve("not a url", "/api/chat", "https://x"),
            Err(QuantumError::Config(_))
        ));
    }

    #[test]
    fn empty_prompt_skips_transport() {
        let t = Canned::ok(200, "{}");
        let a = assistant(Arc::clone(&t), false);
        let AssistantOutcome::Answered(text) = a.ask("   ") else {
            panic!("usage expected");
        };
        assert!(text.contains("Usage: ai -"));
        assert!(t.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn success_includes_tag_and_tokens() {
        let t = Canned::ok(200, r#"{"response":"Rust, mostly.","tokensUsed":42}"#);
        let a = assistant(Arc::clone(&t), false);
        assert_eq!(
            a.ask("what languages?"),
            AssistantOutcome::Answered(
                "🤖 AhrazOmatic9000: Rust, mostly.\n\n💡 Tokens used: 42".to_string()
            )
        );
        let seen = t.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "http://api.test/api/chat");
        assert_eq!(seen[0].1, json!({ "prompt": "what languages?" }));
    }

    #[test]
    fn success_from_localhost_notes_live_api() {
        let t = Canned::ok(200, r#"{"response":"hi"}"#);
        let AssistantOutcome::Answered(text) = assistant(t, true).ask("hello") else {
            panic!("answer expected");
        };
        assert!(text.contains("Tokens used: unknown"));
        assert!(text.ends_with("(Powered by live API from localhost)"));
    }

    #[test]
    fn server_error_is_shown_verbatim() {
        let t = Canned::ok(429, r#"{"error":"Whoa there! Too many questions."}"#);
        assert_eq!(
            assistant(t, false).ask("hi"),
            AssistantOutcome::Answered(
                "🤖 AhrazOmatic9000: Whoa there! Too many questions.".to_string()
            )
        );
    }

    #[test]
    fn transport_failure_uses_fallback() {
        let t = Canned::new(Err(QuantumError::Transport("refused".into())));
        let AssistantOutcome::Failed(text) = assistant(t, false).ask("hi") else {
            panic!("failure expected");
        };
        assert!(text.contains("technical difficulties"));
        assert!(text.contains("ahrazkibria@torontomu.ca"));
    }

    #[test]
    fn local_transport_failure_points_to_live_site() {
        let t = Canned::new(Err(QuantumError::Transport("refused".into())));
        let AssistantOutcome::Failed(text) = assistant(t, true).ask("hi") else {
            panic!("failure expected");
        };
        assert!(text.contains("Localhost can't reach the live API"));
        assert!(text.contains("vercel.app"));
    }

    #[test]
    fn non_json_body_is_a_failure() {
        let t = Canned::ok(502, "<html>Bad gateway</html>");
        assert!(matches!(assistant(t, false).ask("hi"), AssistantOutcome::Failed(_)));
    }
}
