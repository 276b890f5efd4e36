//! Per-channel handler registry.
//!
//! A [`Registry`] holds the handlers of one channel in dispatch order and
//! guarantees that each handler identity appears at most once. It never
//! invokes handlers; dispatchers take a [`snapshot`](Registry::snapshot) and
//! run it without holding the lock.

use botbus_core::{Channel, HandlerId, Priority};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How a registry orders its handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    /// Registration order.
    #[default]
    Registration,
    /// Descending priority; registration order among equal priorities.
    Priority,
}

impl Ordering {
    /// The ordering a registry for `channel` uses.
    pub const fn for_channel(channel: Channel) -> Self {
        if channel.is_prioritized() {
            Ordering::Priority
        } else {
            Ordering::Registration
        }
    }
}

/// A registered handler with its metadata.
struct Entry<H: ?Sized> {
    id: HandlerId,
    handler: Arc<H>,
    priority: Priority,
}

/// A thread-safe, deduplicated, ordered set of handlers.
///
/// `H` is usually a trait object such as `dyn Handler<MessageEvent>`.
///
/// # Example
/// ```ignore
/// let registry: Registry<dyn Handler<MessageEvent>> = Registry::new(Ordering::Priority);
/// let echo = Arc::new(EchoHandler);
///
/// assert!(registry.register(echo.clone(), Priority::High));
/// assert!(!registry.register(echo.clone(), Priority::Low)); // already present
/// assert_eq!(registry.len(), 1);
/// ```
pub struct Registry<H: ?Sized> {
    entries: Mutex<Vec<Entry<H>>>,
    ordering: Ordering,
}

impl<H: ?Sized> Registry<H> {
    /// Create an empty registry.
    pub fn new(ordering: Ordering) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            ordering,
        }
    }

    /// The ordering this registry maintains.
    pub fn ordering(&self) -> Ordering {
        self.ordering
    }

    /// Register a handler.
    ///
    /// Returns `false` without modifying the registry if a handler with the
    /// same identity is already registered (its original priority is kept).
    /// On a registration-ordered registry the priority is ignored.
    pub fn register(&self, handler: Arc<H>, priority: Priority) -> bool {
        let id = HandlerId::of(&handler);
        let mut entries = self.lock();
        if entries.iter().any(|e| e.id == id) {
            tracing::debug!(?id, "duplicate registration ignored");
            return false;
        }

        let priority = match self.ordering {
            Ordering::Registration => Priority::Normal,
            Ordering::Priority => priority,
        };
        entries.push(Entry {
            id,
            handler,
            priority,
        });
        if self.ordering == Ordering::Priority {
            // `sort_by` is stable: equal priorities keep registration order.
            entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        }
        tracing::debug!(?id, %priority, count = entries.len(), "handler registered");
        true
    }

    /// Remove every entry with the given identity.
    ///
    /// Returns `true` if anything was removed.
    pub fn unregister(&self, id: HandlerId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = before != entries.len();
        if removed {
            tracing::debug!(?id, count = entries.len(), "handler unregistered");
        }
        removed
    }

    /// Whether a handler with this identity is registered.
    pub fn contains(&self, id: HandlerId) -> bool {
        self.lock().iter().any(|e| e.id == id)
    }

    /// The priority a handler was registered with.
    pub fn priority_of(&self, id: HandlerId) -> Option<Priority> {
        self.lock().iter().find(|e| e.id == id).map(|e| e.priority)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove all handlers, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let removed = entries.len();
        entries.clear();
        if removed > 0 {
            tracing::debug!(removed, "registry cleared");
        }
        removed
    }

    /// A copy of the current handler sequence, in dispatch order.
    ///
    /// Later registrations or removals do not affect a snapshot already taken.
    pub fn snapshot(&self) -> Vec<Arc<H>> {
        self.lock().iter().map(|e| e.handler.clone()).collect()
    }

    /// Handler identities with their priorities, in dispatch order.
    pub fn entries(&self) -> Vec<(HandlerId, Priority)> {
        self.lock().iter().map(|e| (e.id, e.priority)).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry<H>>> {
        // Handlers never run under this lock, so a poisoned guard still holds
        // a consistent vector.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: ?Sized> Default for Registry<H> {
    fn default() -> Self {
        Self::new(Ordering::default())
    }
}

impl<H: ?Sized> std::fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("ordering", &self.ordering)
            .field("len", &self.len())
            .finish()
    }
}
