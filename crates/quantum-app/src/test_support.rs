//! A terminal that never touches the network.

use std::sync::Arc;

use quantum_terminal::{
    Assistant, AssistantTransport, Endpoint, Result, Terminal, TerminalConfig, TransportResponse,
};

struct Offline;

impl AssistantTransport for Offline {
    fn post_json(&self, _url: &str, body: &serde_json::Value) -> Result<TransportResponse> {
        let prompt = body["prompt"].as_str().unwrap_or_default();
        Ok(TransportResponse {
            status: 200,
            body: serde_json::json!({ "response": format!("offline: {prompt}"), "tokensUsed": 1 })
                .to_string(),
        })
    }
}

/// Every entry is fully revealed as soon as it is pushed.
pub fn offline_terminal() -> Terminal {
    let mut config = TerminalConfig::default();
    config.typewriter.welcome_delay_ms = 0;
    config.typewriter.entry_delay_ms = 0;
    config.typewriter.line_delay_ms = 0;
    offline_terminal_with(config)
}

pub fn offline_terminal_with(config: TerminalConfig) -> Terminal {
    let assistant = Assistant::new(
        Arc::new(Offline),
        Endpoint::fixed("http://offline.test/api/chat", false),
        &config,
    );
    Terminal::new(config, assistant)
}
