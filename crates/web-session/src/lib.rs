use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::Duration;
use tracing::{debug, info};
use url::Url;

use ventureflow_core::config::SessionConfig;
use ventureflow_core::store::KvStore;

mod actor;
mod bootstrap;
mod controller;
mod cookies;
mod state;
mod surface;

pub use actor::{spawn_session, SessionHandle};
pub use bootstrap::{build_entry_request, resolve_target, EntryRequest};
pub use controller::{NavEvent, NavState, SessionController};
pub use cookies::{shared_jar, CookieJar, CookieRecord, SharedCookieJar};
pub use state::{SessionState, BLANK_SENTINEL};
pub use surface::HttpSurface;

/// Outcome of a completed web-surface launch, for reporting.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub state: NavState,
    pub current_url: Option<Url>,
    pub stalls: u32,
}

/// A bootstrapped embedded-browser session: resolved entry request,
/// restored cookie jar, and the navigation controller, ready to run
/// against a surface.
#[derive(Debug)]
pub struct BrowserSession {
    controller: SessionController,
    entry: EntryRequest,
    jar: SharedCookieJar,
    session_state: SessionState,
    watchdog: Duration,
}

impl BrowserSession {
    /// Session bootstrap: resolve the target URL (persisted last URL
    /// unless it is the blank sentinel), restore the cookie snapshot
    /// into the active jar before any request goes out, and prepare the
    /// entry navigation.
    pub fn bootstrap(
        config: &SessionConfig,
        accept_language: &str,
        store: Arc<KvStore>,
    ) -> Result<Self> {
        let original = Url::parse(&config.target_url).context("parse web surface target URL")?;
        let session_state = SessionState::new(store);

        let jar = shared_jar(CookieJar::restore(session_state.cookie_snapshot()));
        let resolved = resolve_target(session_state.last_navigated_url().as_deref(), &original);
        debug!(target = %resolved, "session target resolved");

        let entry = {
            let jar = jar.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // No surface URL exists before the first load, so no Referer.
            build_entry_request(&resolved, &original, None, accept_language, &jar)
        };

        let controller = SessionController::new(original, session_state.clone());
        Ok(Self {
            controller,
            entry,
            jar,
            session_state,
            watchdog: Duration::from_secs(config.watchdog_secs),
        })
    }

    pub fn entry_request(&self) -> &EntryRequest {
        &self.entry
    }

    /// Drives the entry navigation through the headless surface and
    /// snapshots the cookie jar once the navigation settles.
    pub async fn run(self, user_agent: &str) -> Result<SessionSummary> {
        let Self {
            controller,
            entry,
            jar,
            session_state,
            watchdog,
        } = self;

        let surface = HttpSurface::new(user_agent, jar.clone())?;
        let handle = spawn_session(controller, watchdog);

        handle.post(NavEvent::NavigationStarted);
        match surface.navigate(&entry).await {
            Ok(url) => handle.post(NavEvent::NavigationFinished { url }),
            Err(err) => {
                debug!(error = %err, "entry navigation failed");
                handle.post(NavEvent::NavigationFailed);
            }
        }

        let controller = handle.finish().await?;

        let snapshot = {
            let jar = jar.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            jar.snapshot()
        };
        session_state.save_cookie_snapshot(&snapshot)?;
        info!(state = ?controller.state(), cookies = snapshot.len(), "session settled");

        Ok(SessionSummary {
            state: controller.state(),
            current_url: controller.current_url().cloned(),
            stalls: controller.stall_count(),
        })
    }
}
