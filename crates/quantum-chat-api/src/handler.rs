//! Request handling, independent of the HTTP server.

use log::{debug, warn};
use serde_json::{Value, json};

use quantum_types::QuantumError;

use crate::classify::FailureClass;
use crate::config::ProxyConfig;
use crate::upstream::Upstream;
use crate::validate::extract_prompt;

/// Headers attached to every response.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Credentials", "true"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET,OPTIONS,PATCH,DELETE,POST,PUT"),
    (
        "Access-Control-Allow-Headers",
        "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, \
         Content-MD5, Content-Type, Date, X-Api-Version",
    ),
];

/// The parts of an HTTP request the handler looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: String,
    /// Request target; a query string is ignored.
    pub path: String,
    pub body: String,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: body.into(),
        }
    }
}

/// Status plus optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "error": message.into() }))
    }

    /// Serialized body, empty when there is none.
    pub fn body_text(&self) -> String {
        self.body.as_ref().map(Value::to_string).unwrap_or_default()
    }
}

/// Answer one request.
pub fn handle(req: &ApiRequest, config: &ProxyConfig, upstream: &dyn Upstream) -> ApiResponse {
    let path = req.path.split('?').next().unwrap_or_default();
    if path != config.route {
        debug!("{} {} -> 404", req.method, req.path);
        return ApiResponse::error(404, "Not found");
    }

    if req.method.eq_ignore_ascii_case("OPTIONS") {
        return ApiResponse {
            status: 200,
            body: None,
        };
    }
    if !req.method.eq_ignore_ascii_case("POST") {
        return ApiResponse::error(405, "Method not allowed");
    }

    let prompt = match extract_prompt(&req.body, config) {
        Ok(p) => p,
        Err(rejection) => {
            debug!("prompt rejected: {rejection:?}");
            return ApiResponse::error(400, rejection.message(config));
        },
    };

    match upstream.complete(&prompt) {
        Ok(done) => ApiResponse::json(
            200,
            json!({ "response": done.text, "tokensUsed": done.tokens_used }),
        ),
        Err(e) => {
            let message = match &e {
                QuantumError::Upstream(msg) => msg.clone(),
                other => other.to_string(),
            };
            let class = FailureClass::of(&message);
            warn!("upstream failure ({class:?}): {message}");
            ApiResponse::error(class.status(), class.message(&config.persona_name))
        },
    }
}
