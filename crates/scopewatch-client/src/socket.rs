//! socket.dev score API client.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use scopewatch_model::{PackageId, ScoreBundle};
use tracing::info;

use crate::error::ClientResult;
use crate::transport::Transport;

/// Production base URL of the socket.dev API.
const API_BASE: &str = "https://api.socket.dev";

/// Client for the socket.dev per-package score endpoint.
///
/// The API expects the bare token base64-encoded in a basic-auth-style
/// header, not a `user:pass` pair. The token itself never appears in
/// logs.
#[derive(Debug, Clone)]
pub struct SocketClient {
    transport: Transport,
    base: String,
    auth_header: String,
}

impl SocketClient {
    /// Client pointed at the production socket.dev API.
    pub fn new(transport: Transport, token: &str) -> Self {
        Self::with_base_url(transport, token, API_BASE)
    }

    /// Client with an explicit base URL (used by tests).
    pub fn with_base_url(transport: Transport, token: &str, base: impl Into<String>) -> Self {
        Self {
            transport,
            base: base.into(),
            auth_header: format!("Basic {}", BASE64.encode(token)),
        }
    }

    /// Fetch the six-dimension score bundle for a package version.
    pub async fn score(&self, package: &PackageId) -> ClientResult<ScoreBundle> {
        let url = format!(
            "{}/v0/npm/{}/{}/score",
            self.base, package.name, package.version
        );
        info!(package = %package, "requesting package scores from socket.dev");

        self.transport
            .get_json(&url, |r| {
                r.header(ACCEPT, "application/json")
                    .header(AUTHORIZATION, self.auth_header.as_str())
            })
            .await
    }
}
