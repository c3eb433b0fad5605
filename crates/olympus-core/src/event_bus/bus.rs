use super::types::OlympusEvent;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::debug;

/// Synchronous observer invoked before broadcast
pub trait EventHook: Send + Sync {
    /// Observe one event
    fn on_event(&self, event: &OlympusEvent);
}

impl<F> EventHook for F
where
    F: Fn(&OlympusEvent) + Send + Sync,
{
    fn on_event(&self, event: &OlympusEvent) {
        self(event)
    }
}

/// Broadcast-based event bus with an explicit lifecycle.
///
/// A new bus is stopped; call [`EventBus::init`] before publishing.
/// Slow subscribers will miss events (lagged) rather than blocking the publisher.
pub struct EventBus {
    sender: broadcast::Sender<OlympusEvent>,
    hooks: RwLock<Vec<Arc<dyn EventHook>>>,
    running: AtomicBool,
}

impl EventBus {
    /// Create a stopped bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            hooks: RwLock::new(Vec::new()),
            running: AtomicBool::new(false),
        }
    }

    /// Start accepting events
    pub fn init(&self) {
        if !self.running.swap(true, Ordering::SeqCst) {
            debug!("event bus started");
        }
    }

    /// Stop accepting events; later publishes are no-ops
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            debug!("event bus stopped");
        }
    }

    /// Whether the bus accepts events
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Append a hook; hooks run in the order they were added
    pub fn add_hook(&self, hook: impl EventHook + 'static) {
        self.hooks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(hook));
    }

    /// Number of registered hooks
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Subscribe to events. Returns a receiver that will get all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OlympusEvent> {
        self.sender.subscribe()
    }

    /// Publish an event: hooks first, then subscribers.
    ///
    /// Returns the number of subscribers that received the event (0 when stopped).
    pub fn publish(&self, event: OlympusEvent) -> usize {
        if !self.is_running() {
            return 0;
        }

        // Snapshot so a hook may add hooks without deadlocking
        let hooks: Vec<Arc<dyn EventHook>> = self
            .hooks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for hook in &hooks {
            hook.on_event(&event);
        }

        // send() returns Err if there are no receivers, which is fine
        self.sender.send(event).unwrap_or(0)
    }

    /// Get the current number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("running", &self.is_running())
            .field("hooks", &self.hook_count())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
