use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};
use url::Url;

use ventureflow_core::config::GateConfig;
use ventureflow_core::store::KvStore;

mod decision;
mod outcome;
mod probe;
mod state;

pub use decision::{classify, GateDecision};
pub use outcome::ProbeOutcome;
pub use probe::ProbeClient;
pub use state::GateState;

/// Which top-level surface the application boots into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Native,
    Web,
}

impl Surface {
    fn from_blocked(blocked: bool) -> Self {
        if blocked {
            Surface::Native
        } else {
            Surface::Web
        }
    }
}

/// Runs the launch-time gate: one probe, one classification, one durable
/// write, then surface selection. The first resolution of a launch is
/// final; later calls return the already-rendered decision untouched.
#[derive(Debug)]
pub struct GateEngine {
    endpoint: String,
    probe: ProbeClient,
    state: GateState,
    decision: GateDecision,
}

impl GateEngine {
    pub fn new(config: &GateConfig, store: Arc<KvStore>) -> Result<Self> {
        Ok(Self {
            endpoint: config.endpoint.clone(),
            probe: ProbeClient::new(config)?,
            state: GateState::new(store),
            decision: GateDecision::fail_safe(),
        })
    }

    /// Probes, classifies and persists the blocked flag. The flag is
    /// durably written before this returns, so surface selection never
    /// races the write.
    pub async fn resolve(&mut self) -> Result<Surface> {
        if self.decision.decided {
            debug!(blocked = self.decision.blocked, "gate already resolved this launch");
            return Ok(Surface::from_blocked(self.decision.blocked));
        }

        let blocked = match Url::parse(&self.endpoint) {
            // Unconfigured or malformed endpoint: fail safe without
            // touching the network.
            Err(err) => {
                debug!(error = %err, "gate endpoint not probeable");
                true
            }
            Ok(endpoint) => {
                let outcome = self.probe.probe(&endpoint).await;
                classify(&outcome)
            }
        };

        self.state.save_blocked(blocked)?;
        self.decision = GateDecision { blocked, decided: true };
        info!(blocked, "gate decision persisted");
        Ok(Surface::from_blocked(blocked))
    }

    pub fn decision(&self) -> GateDecision {
        self.decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use ventureflow_core::store::keys;
    use ventureflow_core::Config;

    fn temp_store() -> (tempfile::TempDir, Arc<KvStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(KvStore::open(&dir.path().join("defaults.json")).unwrap());
        (dir, store)
    }

    fn gate_config(endpoint: String) -> ventureflow_core::config::GateConfig {
        let mut config = Config::default_config().gate;
        config.endpoint = endpoint;
        config
    }

    async fn one_shot_server(response: String) -> std::net::SocketAddr {
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

    #[tokio::test]
    async fn test_unconfigured_endpoint_fails_safe_and_persists() {
        let (_dir, store) = temp_store();
        let mut engine = GateEngine::new(&gate_config(String::new()), store.clone()).unwrap();

        let surface = engine.resolve().await.unwrap();

        assert_eq!(surface, Surface::Native);
        assert!(engine.decision().decided);
        assert_eq!(store.get::<bool>(keys::GATE_BLOCKED), Some(true));
    }

    #[tokio::test]
    async fn test_success_with_body_selects_web_surface() {
        // Scenario: probe returns a 200 with a sizeable body.
        let body = "x".repeat(1200);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let addr = one_shot_server(response).await;

        let (_dir, store) = temp_store();
        let mut engine =
            GateEngine::new(&gate_config(format!("http://{addr}/gate")), store.clone()).unwrap();

        let surface = engine.resolve().await.unwrap();

        assert_eq!(surface, Surface::Web);
        assert_eq!(store.get::<bool>(keys::GATE_BLOCKED), Some(false));
    }

    #[tokio::test]
    async fn test_redirect_selects_web_surface() {
        let addr = one_shot_server(
            "HTTP/1.1 302 Found\r\nLocation: http://example.invalid/\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string(),
        )
        .await;

        let (_dir, store) = temp_store();
        let mut engine =
            GateEngine::new(&gate_config(format!("http://{addr}/gate")), store.clone()).unwrap();

        assert_eq!(engine.resolve().await.unwrap(), Surface::Web);
    }

    #[tokio::test]
    async fn test_not_found_selects_native_surface() {
        let addr = one_shot_server(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;

        let (_dir, store) = temp_store();
        let mut engine =
            GateEngine::new(&gate_config(format!("http://{addr}/gate")), store.clone()).unwrap();

        assert_eq!(engine.resolve().await.unwrap(), Surface::Native);
        assert_eq!(store.get::<bool>(keys::GATE_BLOCKED), Some(true));
    }

    #[tokio::test]
    async fn test_second_resolution_is_idempotent() {
        let (_dir, store) = temp_store();
        let mut engine = GateEngine::new(&gate_config(String::new()), store).unwrap();

        let first = engine.resolve().await.unwrap();
        // The endpoint is unreachable either way, but the second call must
        // not re-run the decision at all.
        let second = engine.resolve().await.unwrap();

        assert_eq!(first, second);
        assert!(engine.decision().decided);
    }
}
