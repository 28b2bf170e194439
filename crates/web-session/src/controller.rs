use tracing::{debug, warn};
use url::Url;

use crate::state::SessionState;

/// Navigation states of the single rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Navigation events, either real (from the surface driver) or
/// synthetic (from tests). The watchdog event is produced by the
/// session actor's timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    NavigationStarted,
    NavigationFinished { url: Url },
    NavigationFailed,
    WatchdogFired,
}

/// Event-driven controller for the embedded browser surface.
///
/// All mutation goes through [`SessionController::on_event`]; the
/// embedding actor is the single writer. A stalled load is recorded and
/// nothing else: the surface stays visible and keeps waiting.
#[derive(Debug)]
pub struct SessionController {
    state: NavState,
    original_target: Url,
    current_url: Option<Url>,
    watchdog_armed: bool,
    stall_count: u32,
    session_state: SessionState,
}

impl SessionController {
    pub fn new(original_target: Url, session_state: SessionState) -> Self {
        Self {
            state: NavState::Idle,
            original_target,
            current_url: None,
            watchdog_armed: false,
            stall_count: 0,
            session_state,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn current_url(&self) -> Option<&Url> {
        self.current_url.as_ref()
    }

    pub fn original_target(&self) -> &Url {
        &self.original_target
    }

    /// True while a loading navigation should be covered by the watchdog.
    pub fn watchdog_armed(&self) -> bool {
        self.watchdog_armed
    }

    pub fn stall_count(&self) -> u32 {
        self.stall_count
    }

    /// Single entry point for all navigation events. Returns the state
    /// after the transition.
    pub fn on_event(&mut self, event: NavEvent) -> NavState {
        match event {
            NavEvent::NavigationStarted => {
                // Every navigation, including in-page ones, re-enters
                // Loading and re-arms the one-shot watchdog.
                self.state = NavState::Loading;
                self.watchdog_armed = true;
                debug!("navigation started");
            }
            NavEvent::NavigationFinished { url } => {
                self.state = NavState::Loaded;
                self.watchdog_armed = false;
                if url.as_str() != self.original_target.as_str() {
                    if let Err(err) = self.session_state.save_last_navigated_url(url.as_str()) {
                        warn!(error = %err, "failed to persist last navigated URL");
                    }
                }
                debug!(url = %url, "navigation finished");
                self.current_url = Some(url);
            }
            NavEvent::NavigationFailed => {
                // Includes provisional navigation failures. No retry.
                self.state = NavState::Failed;
                self.watchdog_armed = false;
                debug!("navigation failed");
            }
            NavEvent::WatchdogFired => {
                if self.state == NavState::Loading && self.watchdog_armed {
                    // Record the stall; the load keeps waiting.
                    self.stall_count = self.stall_count.saturating_add(1);
                    self.watchdog_armed = false;
                    warn!(stalls = self.stall_count, "page load stalled");
                }
            }
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ventureflow_core::store::{keys, KvStore};

    fn controller_with_store() -> (tempfile::TempDir, Arc<KvStore>, SessionController) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(KvStore::open(&dir.path().join("defaults.json")).unwrap());
        let target = Url::parse("https://landing.example/entry").unwrap();
        let controller = SessionController::new(target, SessionState::new(store.clone()));
        (dir, store, controller)
    }

    #[test]
    fn test_initial_state_is_idle() {
        let (_dir, _store, controller) = controller_with_store();
        assert_eq!(controller.state(), NavState::Idle);
        assert_eq!(controller.stall_count(), 0);
    }

    #[test]
    fn test_load_cycle_persists_diverging_url() {
        let (_dir, store, mut controller) = controller_with_store();

        assert_eq!(controller.on_event(NavEvent::NavigationStarted), NavState::Loading);
        assert!(controller.watchdog_armed());

        let reached = Url::parse("https://landing.example/checkout").unwrap();
        let state = controller.on_event(NavEvent::NavigationFinished { url: reached.clone() });

        assert_eq!(state, NavState::Loaded);
        assert!(!controller.watchdog_armed());
        assert_eq!(controller.current_url(), Some(&reached));
        assert_eq!(
            store.get::<String>(keys::LAST_NAVIGATED_URL).as_deref(),
            Some("https://landing.example/checkout")
        );
    }

    #[test]
    fn test_finishing_on_original_target_persists_nothing() {
        let (_dir, store, mut controller) = controller_with_store();
        controller.on_event(NavEvent::NavigationStarted);

        let target = controller.original_target().clone();
        controller.on_event(NavEvent::NavigationFinished { url: target });

        assert!(!store.contains(keys::LAST_NAVIGATED_URL));
    }

    #[test]
    fn test_failure_disarms_watchdog_without_persisting() {
        let (_dir, store, mut controller) = controller_with_store();
        controller.on_event(NavEvent::NavigationStarted);

        let state = controller.on_event(NavEvent::NavigationFailed);

        assert_eq!(state, NavState::Failed);
        assert!(!controller.watchdog_armed());
        assert!(!store.contains(keys::LAST_NAVIGATED_URL));
    }

    #[test]
    fn test_watchdog_records_stall_and_keeps_loading() {
        let (_dir, _store, mut controller) = controller_with_store();
        controller.on_event(NavEvent::NavigationStarted);

        let state = controller.on_event(NavEvent::WatchdogFired);

        // No corrective action: still loading, stall recorded once.
        assert_eq!(state, NavState::Loading);
        assert_eq!(controller.stall_count(), 1);

        // A stale second firing is ignored.
        controller.on_event(NavEvent::WatchdogFired);
        assert_eq!(controller.stall_count(), 1);
    }

    #[test]
    fn test_watchdog_after_completion_is_ignored() {
        let (_dir, _store, mut controller) = controller_with_store();
        controller.on_event(NavEvent::NavigationStarted);
        let target = controller.original_target().clone();
        controller.on_event(NavEvent::NavigationFinished { url: target });

        controller.on_event(NavEvent::WatchdogFired);
        assert_eq!(controller.stall_count(), 0);
    }

    #[test]
    fn test_loading_reentered_on_new_navigation() {
        let (_dir, _store, mut controller) = controller_with_store();
        controller.on_event(NavEvent::NavigationStarted);
        let target = controller.original_target().clone();
        controller.on_event(NavEvent::NavigationFinished { url: target });

        let state = controller.on_event(NavEvent::NavigationStarted);
        assert_eq!(state, NavState::Loading);
        assert!(controller.watchdog_armed());
    }
}
