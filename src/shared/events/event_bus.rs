use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::log_debug;

pub type EventHandler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle returned by `subscribe`; pass it to `unsubscribe` to detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// In-process observer registry
///
/// Every clone shares the same subscriber table, so a bus can be handed to
/// producers and consumers independently. Handlers run synchronously on the
/// publishing task and must not block.
pub struct EventBus<E> {
    subscribers: Arc<DashMap<SubscriptionId, EventHandler<E>>>,
    next_id: Arc<AtomicU64>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.insert(id, Arc::new(handler));
        log_debug!("Event subscriber {:?} attached", id);
        id
    }

    /// Returns false if the id was already detached
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// Deliver `event` to every current subscriber, returns how many received it
    pub fn publish(&self, event: &E) -> usize {
        // Snapshot first so handlers may (un)subscribe without deadlocking the map
        let handlers: Vec<EventHandler<E>> = self
            .subscribers
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for handler in &handlers {
            handler(event);
        }

        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
