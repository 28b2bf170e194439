use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// Typed change notifications posted by the repositories after each
/// mutation. Subscribers poll their receiver; a dropped receiver is
/// pruned on the next post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    ProjectsChanged,
    TasksChanged,
    MilestonesChanged,
    ResourcesChanged,
    CategoriesChanged,
    HistoryChanged,
    DataChanged,
}

/// Process-scoped observer registry replacing ambient broadcast
/// notifications with explicit typed channels.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<ChangeEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        let (sender, receiver) = channel();
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.push(sender);
        receiver
    }

    pub fn post(&self, event: ChangeEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.retain(|sender| sender.send(event).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_receive_posted_events() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.post(ChangeEvent::TasksChanged);

        assert_eq!(first.try_recv().unwrap(), ChangeEvent::TasksChanged);
        assert_eq!(second.try_recv().unwrap(), ChangeEvent::TasksChanged);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let bus = EventBus::new();
        let receiver = bus.subscribe();
        drop(receiver);

        bus.post(ChangeEvent::DataChanged);

        let survivors = bus.subscribers.lock().unwrap();
        assert!(survivors.is_empty());
    }
}
