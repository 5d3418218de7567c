//! # void_event - Synchronous Event System
//!
//! Typed publish/subscribe with:
//! - Immediate, in-order delivery (events reach handlers in publish order)
//! - Priority between handlers of the same event type
//! - A recording [`EventChannel`] for consumers that poll instead of subscribe

use parking_lot::{Mutex, RwLock};
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handler priority
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Trait for events
pub trait Event: Send + Sync + 'static {}

// Blanket implementation
impl<T: Send + Sync + 'static> Event for T {}

/// Dynamic event handler
pub type DynamicHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

struct Subscription {
    id: SubscriberId,
    priority: Priority,
    handler: DynamicHandler,
}

/// Event bus delivering events synchronously to subscribers.
///
/// Handlers run on the publishing thread before `publish` returns. A handler
/// may publish further events, but must not subscribe or unsubscribe.
pub struct EventBus {
    handlers: RwLock<BTreeMap<TypeId, Vec<Subscription>>>,
    next_subscriber_id: AtomicU64,
    published: AtomicU64,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(BTreeMap::new()),
            next_subscriber_id: AtomicU64::new(1),
            published: AtomicU64::new(0),
        }
    }

    /// Publish an event to every subscriber of its type
    pub fn publish<E: Event>(&self, event: E) {
        self.published.fetch_add(1, Ordering::Relaxed);
        let handlers = self.handlers.read_recursive();
        if let Some(subs) = handlers.get(&TypeId::of::<E>()) {
            for sub in subs {
                (sub.handler)(&event);
            }
        }
    }

    /// Subscribe to an event type
    pub fn subscribe<E: Event, F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority::<E, F>(handler, Priority::Normal)
    }

    /// Subscribe with priority
    pub fn subscribe_with_priority<E: Event, F>(&self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id.fetch_add(1, Ordering::Relaxed));

        let wrapped_handler: DynamicHandler = Box::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                handler(event);
            }
        });

        let mut handlers = self.handlers.write();
        let subs = handlers.entry(TypeId::of::<E>()).or_default();
        subs.push(Subscription {
            id,
            priority,
            handler: wrapped_handler,
        });
        // Stable: equal priorities keep subscription order
        subs.sort_by(|a, b| b.priority.cmp(&a.priority));

        log::trace!("Subscriber {:?} registered for {}", id, std::any::type_name::<E>());
        id
    }

    /// Forward every event of type `E` into a channel
    pub fn forward_to<E: Event + Clone>(&self, channel: Arc<EventChannel<E>>) -> SubscriberId {
        self.subscribe(move |event: &E| channel.send(event.clone()))
    }

    /// Unsubscribe
    pub fn unsubscribe(&self, id: SubscriberId) {
        for subs in self.handlers.write().values_mut() {
            subs.retain(|sub| sub.id != id);
        }
    }

    /// Number of handlers registered for `E`
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.handlers
            .read()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Total number of events published so far
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.handlers.read().len())
            .field("published", &self.published_count())
            .finish()
    }
}

/// FIFO channel for single-type events
pub struct EventChannel<E: Event> {
    queue: Mutex<VecDeque<E>>,
}

impl<E: Event> EventChannel<E> {
    /// Create a new channel
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Send an event
    pub fn send(&self, event: E) {
        self.queue.lock().push_back(event);
    }

    /// Receive the oldest event
    pub fn receive(&self) -> Option<E> {
        self.queue.lock().pop_front()
    }

    /// Drain all events in send order
    pub fn drain(&self) -> Vec<E> {
        self.queue.lock().drain(..).collect()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Get pending count
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

impl<E: Event> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Event, EventBus, EventChannel, Priority, SubscriberId};
}
