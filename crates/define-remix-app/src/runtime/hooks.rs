//! Lifecycle hooks of a prepared app

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tracing::debug;

/// Something that happened to a prepared app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A new manifest was published
    ManifestUpdated {
        route_count: usize,
        error_route_count: usize,
        diagnostic_count: usize,
    },
    /// Preview navigation moved to another URL
    Navigated {
        from: String,
        to: String,
        route_id: String,
    },
    /// The app was disposed; no further events follow
    Disposed,
}

/// Identifies a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&LifecycleEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

/// Dispatches [`LifecycleEvent`]s to registered listeners and subscribers
///
/// Listeners run synchronously in registration order; `subscribe` gives an
/// async receiver for consumers living in their own task.
#[derive(Clone)]
pub struct HookRegistry {
    listeners: Arc<Mutex<Listeners>>,
    tx: broadcast::Sender<LifecycleEvent>,
}

impl HookRegistry {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self {
            listeners: Arc::new(Mutex::new(Listeners::default())),
            tx,
        }
    }

    /// Registers a listener called for every event
    pub fn register(&self, listener: impl Fn(&LifecycleEvent) + Send + Sync + 'static) -> ListenerId {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener, returning whether it was registered
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry_id, _)| *entry_id != id);
        listeners.entries.len() != before
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: LifecycleEvent) {
        debug!("Lifecycle event: {:?}", event);

        // Snapshot so listeners may register or unregister while running
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&event);
        }

        // Ignore if no receivers
        let _ = self.tx.send(event);
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len();
        f.debug_struct("HookRegistry").field("listeners", &count).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listeners_run_in_order_until_unregistered() {
        let hooks = HookRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        let id = hooks.register(move |_| first.lock().unwrap().push("first"));
        let second = Arc::clone(&seen);
        hooks.register(move |_| second.lock().unwrap().push("second"));

        hooks.emit(LifecycleEvent::Disposed);
        assert!(hooks.unregister(id));
        assert!(!hooks.unregister(id));
        hooks.emit(LifecycleEvent::Disposed);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "second"]);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let hooks = HookRegistry::new();
        let mut rx = hooks.subscribe();
        hooks.emit(LifecycleEvent::Disposed);
        assert_eq!(rx.recv().await.unwrap(), LifecycleEvent::Disposed);
    }
}
