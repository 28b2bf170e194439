use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};

use crate::controller::{NavEvent, SessionController};

/// Handle to the single-writer session actor. Events posted here are
/// applied to the controller in order by one task; the watchdog timer
/// lives inside the same loop, so no state is touched from two places.
#[derive(Debug)]
pub struct SessionHandle {
    sender: mpsc::UnboundedSender<NavEvent>,
    task: JoinHandle<SessionController>,
}

impl SessionHandle {
    pub fn post(&self, event: NavEvent) {
        // A closed channel means the actor already finished; the event
        // is irrelevant at that point.
        let _ = self.sender.send(event);
    }

    /// Closes the channel and waits for the actor to drain, returning
    /// the final controller state.
    pub async fn finish(self) -> Result<SessionController> {
        drop(self.sender);
        self.task.await.context("join session actor")
    }
}

pub fn spawn_session(controller: SessionController, watchdog: Duration) -> SessionHandle {
    let (sender, receiver) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_loop(controller, receiver, watchdog));
    SessionHandle { sender, task }
}

async fn run_loop(
    mut controller: SessionController,
    mut receiver: mpsc::UnboundedReceiver<NavEvent>,
    watchdog: Duration,
) -> SessionController {
    let mut deadline: Option<Instant> = None;
    loop {
        let event = match deadline {
            Some(at) => tokio::select! {
                _ = sleep_until(at) => NavEvent::WatchdogFired,
                received = receiver.recv() => match received {
                    Some(event) => event,
                    None => break,
                },
            },
            None => match receiver.recv().await {
                Some(event) => event,
                None => break,
            },
        };

        match &event {
            NavEvent::NavigationStarted => deadline = Some(Instant::now() + watchdog),
            // One-shot: reaching a terminal state or firing disarms it.
            NavEvent::NavigationFinished { .. } | NavEvent::NavigationFailed => deadline = None,
            NavEvent::WatchdogFired => deadline = None,
        }
        controller.on_event(event);
    }
    controller
}
