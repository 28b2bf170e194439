use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_LENGTH, PRAGMA, USER_AGENT,
};
use reqwest::redirect;
use tracing::debug;
use url::Url;

use ventureflow_core::config::GateConfig;

use crate::outcome::ProbeOutcome;

pub const PROBE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const PROBE_ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// Issues the single launch-time GET against the gate endpoint.
///
/// The transport never follows redirects: a 3xx status is classification
/// input, not something to resolve. One attempt, no retries; every
/// transport failure collapses to the same outcome.
#[derive(Debug)]
pub struct ProbeClient {
    client: reqwest::Client,
    user_agent: String,
    accept_language: String,
}

impl ProbeClient {
    pub fn new(config: &GateConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(config.probe_timeout_secs))
            .build()
            .context("build probe HTTP client")?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
        })
    }

    /// Runs the probe. Infallible by design: anything that is not a
    /// parseable HTTP response becomes a fail-safe outcome.
    pub async fn probe(&self, endpoint: &Url) -> ProbeOutcome {
        let request = self
            .client
            .get(endpoint.clone())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, PROBE_ACCEPT)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .header(ACCEPT_ENCODING, PROBE_ACCEPT_ENCODING)
            // Always hit the network, never a cache.
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "probe transport failure");
                return ProbeOutcome::TransportError;
            }
        };

        let status = response.status().as_u16();
        if status != 200 {
            debug!(status, "probe resolved without body inspection");
            return ProbeOutcome::from_status(status, false);
        }

        let declared_empty = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim() == "0")
            .unwrap_or(false);
        // A body that cannot be read counts as absent.
        let body = response.bytes().await.unwrap_or_default();
        let has_body = !declared_empty && !body.is_empty();
        debug!(status, has_body, "probe resolved");
        ProbeOutcome::from_status(status, has_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use ventureflow_core::Config;

    /// Serves exactly one connection with a canned HTTP response.
    async fn one_shot_server(response: &'static str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buffer = [0u8; 4096];
            let _ = stream.read(&mut buffer).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        });
        addr
    }

    fn probe_client() -> ProbeClient {
        ProbeClient::new(&Config::default_config().gate).unwrap()
    }

    fn endpoint_for(addr: SocketAddr) -> Url {
        Url::parse(&format!("http://{addr}/gate")).unwrap()
    }

    #[tokio::test]
    async fn test_success_with_body() {
        let addr = one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
        )
        .await;
        let outcome = probe_client().probe(&endpoint_for(addr)).await;
        assert_eq!(outcome, ProbeOutcome::HttpSuccess { status: 200, has_body: true });
    }

    #[tokio::test]
    async fn test_success_with_content_length_zero() {
        let addr = one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let outcome = probe_client().probe(&endpoint_for(addr)).await;
        assert_eq!(outcome, ProbeOutcome::HttpSuccess { status: 200, has_body: false });
    }

    #[tokio::test]
    async fn test_redirect_is_not_followed() {
        let addr = one_shot_server(
            "HTTP/1.1 302 Found\r\nLocation: http://127.0.0.1:1/elsewhere\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let outcome = probe_client().probe(&endpoint_for(addr)).await;
        assert_eq!(outcome, ProbeOutcome::HttpRedirect { status: 302 });
    }

    #[tokio::test]
    async fn test_client_error_status() {
        let addr = one_shot_server(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let outcome = probe_client().probe(&endpoint_for(addr)).await;
        assert_eq!(outcome, ProbeOutcome::HttpError { status: 404 });
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() {
        // Bind then drop to find a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = probe_client().probe(&endpoint_for(addr)).await;
        assert_eq!(outcome, ProbeOutcome::TransportError);
    }
}
