//! `tiny_http` front for [`handle`](crate::handler::handle).

use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;

use log::{debug, info, warn};
use tiny_http::{Header, Request, Response, Server};

use quantum_types::{QuantumError, Result};

use crate::config::ProxyConfig;
use crate::handler::{ApiRequest, ApiResponse, CORS_HEADERS, handle};
use crate::upstream::Upstream;

/// Request bodies beyond this are cut off (and then fail JSON parsing).
const MAX_BODY_BYTES: u64 = 64 * 1024;

/// The chat endpoint server.
pub struct ChatServer {
    server: Server,
    config: Arc<ProxyConfig>,
    upstream: Arc<dyn Upstream>,
}

impl ChatServer {
    /// Bind to `config.bind`.
    pub fn bind(config: ProxyConfig, upstream: Arc<dyn Upstream>) -> Result<Self> {
        let server = Server::http(&config.bind)
            .map_err(|e| QuantumError::Config(format!("cannot bind {}: {e}", config.bind)))?;
        Ok(Self {
            server,
            config: Arc::new(config),
            upstream,
        })
    }

    /// Actual listening address (useful with port 0).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Accept requests until [`unblock`](Self::unblock) is called. Each
    /// request is answered on its own thread.
    pub fn run(&self) {
        info!("chat api listening on {:?} (route {})", self.local_addr(), self.config.route);
        loop {
            let request = match self.server.recv() {
                Ok(r) => r,
                Err(e) => {
                    info!("chat api stopped: {e}");
                    break;
                },
            };
            let config = Arc::clone(&self.config);
            let upstream = Arc::clone(&self.upstream);
            let spawned = thread::Builder::new()
                .name("chat-request".into())
                .spawn(move || serve(request, &config, upstream.as_ref()));
            if let Err(e) = spawned {
                warn!("cannot spawn request thread: {e}");
            }
        }
    }

    /// Make a blocked [`run`](Self::run) return.
    pub fn unblock(&self) {
        self.server.unblock();
    }
}

fn serve(mut request: Request, config: &ProxyConfig, upstream: &dyn Upstream) {
    let mut body = String::new();
    if let Err(e) = request
        .as_reader()
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut body)
    {
        debug!("unreadable request body: {e}");
        body.clear();
    }
    let api_request = ApiRequest::new(request.method().to_string(), request.url(), body);
    let api_response = handle(&api_request, config, upstream);
    debug!(
        "{} {} -> {}",
        api_request.method, api_request.path, api_response.status
    );
    if let Err(e) = request.respond(to_http(&api_response)) {
        warn!("failed to send response: {e}");
    }
}

fn to_http(resp: &ApiResponse) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut out = Response::from_data(resp.body_text().into_bytes()).with_status_code(resp.status);
    let content_type = resp
        .body
        .is_some()
        .then_some(("Content-Type", "application/json"));
    for (name, value) in CORS_HEADERS.iter().copied().chain(content_type) {
        if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            out.add_header(header);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header<'a>(
        resp: &'a Response<std::io::Cursor<Vec<u8>>>,
        name: &'static str,
    ) -> Option<&'a str> {
        resp.headers()
            .iter()
            .find(|h| h.field.equiv(name))
            .map(|h| h.value.as_str())
    }

    #[test]
    fn json_response_has_cors_and_content_type() {
        let resp = to_http(&ApiResponse {
            status: 405,
            body: Some(json!({ "error": "Method not allowed" })),
        });
        assert_eq!(resp.status_code().0, 405);
        assert_eq!(header(&resp, "Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(header(&resp, "Access-Control-Allow-Credentials"), Some("true"));
        assert_eq!(header(&resp, "Content-Type"), Some("application/json"));
    }

    #[test]
    fn empty_response_has_no_content_type() {
        let resp = to_http(&ApiResponse {
            status: 200,
            body: None,
        });
        assert_eq!(header(&resp, "Content-Type"), None);
        assert_eq!(
            header(&resp, "Access-Control-Allow-Methods"),
            Some("GET,OPTIONS,PATCH,DELETE,POST,PUT")
        );
    }
}
