//! Observable mutable cell with synchronous change notification
//!
//! `Store<T>` is the reactive primitive tracked by the bridge: a
//! thread-safe value that notifies registered listeners in-line whenever
//! it is written. Notification is synchronous: `set` returns only after
//! every listener has observed the new value.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ListenerMap<T> = Arc<Mutex<BTreeMap<u64, Listener<T>>>>;

struct StoreInner<T> {
    value: RwLock<T>,
    listeners: ListenerMap<T>,
    next_listener_id: AtomicU64,
}

/// A shared observable cell holding a value of type `T`.
///
/// Cloning a `Store` clones the handle, not the value: all clones observe
/// and mutate the same state. Listeners registered via [`Store::subscribe`]
/// fire on every [`Store::set`] (and [`Store::update`]), in registration
/// order, on the calling thread.
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Create a new store with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                value: RwLock::new(value),
                listeners: Arc::new(Mutex::new(BTreeMap::new())),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Replace the value and notify every listener with the new value.
    pub fn set(&self, value: T) {
        {
            *self.inner.value.write() = value;
        }
        self.notify();
    }

    /// Update the value through a function, then notify listeners.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let next = f(self.get());
        self.set(next);
    }

    /// Register a change listener.
    ///
    /// The listener fires on every subsequent write; it is not invoked with
    /// the current value at registration time. The returned subscription
    /// removes the listener when consumed.
    pub fn subscribe<F>(&self, listener: F) -> StoreSubscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().insert(id, Arc::new(listener));

        let listeners = Arc::clone(&self.inner.listeners);
        StoreSubscription {
            remove: Some(Box::new(move || {
                listeners.lock().remove(&id);
            })),
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    // Listeners are snapshotted before invocation so no lock is held while
    // user callbacks run; a listener may re-enter get/set without deadlock.
    fn notify(&self) {
        let listeners: Vec<Listener<T>> = self.inner.listeners.lock().values().cloned().collect();
        let value = self.get();
        for listener in listeners {
            listener(&value);
        }
    }
}

impl<T: Clone + Send + Sync + Default + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + std::fmt::Debug + 'static> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("value", &self.get()).finish()
    }
}

/// Handle that removes a listener registered with [`Store::subscribe`].
///
/// Dropping the handle without calling [`StoreSubscription::unsubscribe`]
/// leaves the listener attached for the lifetime of the store.
pub struct StoreSubscription {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl StoreSubscription {
    /// Remove the listener from its store.
    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl std::fmt::Debug for StoreSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSubscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
