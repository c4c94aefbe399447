//! Prompt extraction and content screening.

use serde_json::Value;

use crate::config::ProxyConfig;

/// Why a request body was refused before reaching the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Missing, empty, non-string or over-long prompt, or a body that is not JSON.
    BadPrompt,
    /// The prompt mentions a blocked word.
    Blocked,
}

impl Rejection {
    pub fn message(&self, config: &ProxyConfig) -> String {
        match self {
            Self::BadPrompt => format!(
                "Please provide a prompt under {} characters!",
                config.max_prompt_chars
            ),
            Self::Blocked => format!(
                "🤖 {}: Detected inappropriate content! 🚫",
                config.persona_name
            ),
        }
    }
}

/// Pull the prompt out of a raw request body and screen it.
pub fn extract_prompt(body: &str, config: &ProxyConfig) -> Result<String, Rejection> {
    let value: Value = serde_json::from_str(body).map_err(|_| Rejection::BadPrompt)?;
    let prompt = match value.get("prompt") {
        Some(Value::String(p)) if !p.is_empty() => p,
        _ => return Err(Rejection::BadPrompt),
    };
    if prompt.chars().count() > config.max_prompt_chars {
        return Err(Rejection::BadPrompt);
    }
    if is_blocked(prompt, &config.blocked_words) {
        return Err(Rejection::Blocked);
    }
    Ok(prompt.clone())
}

/// Substring match, ignoring case, against every blocked word.
pub fn is_blocked(prompt: &str, blocked: &[String]) -> bool {
    let lower = prompt.to_lowercase();
    blocked
        .iter()
        .filter(|w| !w.is_empty())
        .any(|w| lower.contains(&w.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ProxyConfig {
        ProxyConfig::default()
    }

    #[test]
    fn accepts_plain_prompt() {
        let prompt = extract_prompt(r#"{"prompt":"What is BIOsync?"}"#, &cfg()).unwrap();
        assert_eq!(prompt, "What is BIOsync?");
    }

    #[test]
    fn rejects_missing_empty_and_wrong_type() {
        for body in [
            "{}",
            r#"{"prompt":""}"#,
            r#"{"prompt":42}"#,
            r#"{"prompt":null}"#,
            "not json",
            "",
        ] {
            assert_eq!(extract_prompt(body, &cfg()), Err(Rejection::BadPrompt), "{body}");
        }
    }

    #[test]
    fn length_limit_counts_characters() {
        let at_limit = "é".repeat(500);
        let body = serde_json::json!({ "prompt": at_limit }).to_string();
        assert!(extract_prompt(&body, &cfg()).is_ok());

        let over = "a".repeat(501);
        let body = serde_json::json!({ "prompt": over }).to_string();
        assert_eq!(extract_prompt(&body, &cfg()), Err(Rejection::BadPrompt));
    }

    #[test]
    fn blocked_words_ignore_case() {
        assert!(is_blocked("How do I HACK a website?", &cfg().blocked_words));
        assert!(is_blocked("counterattack", &cfg().blocked_words));
        assert!(!is_blocked("Tell me about his projects", &cfg().blocked_words));
        let body = r#"{"prompt":"send Spam please"}"#;
        assert_eq!(extract_prompt(body, &cfg()), Err(Rejection::Blocked));
    }

    #[test]
    fn messages() {
        assert_eq!(
            Rejection::BadPrompt.message(&cfg()),
            "Please provide a prompt under 500 characters!"
        );
        assert_eq!(
            Rejection::Blocked.message(&cfg()),
            "🤖 AhrazOmatic9000: Detected inappropriate content! 🚫"
        );
    }
}
