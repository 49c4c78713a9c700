//! Object-safe view of a store for the tracker
//!
//! The tracker holds a heterogeneous named set of stores, so it cannot
//! name their value types. `StateCell` erases the type behind a JSON
//! boundary: values cross it as `serde_json::Value`, and change
//! notifications carry no payload (the bridge re-reads on demand).

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::BridgeError;
use crate::store::cell::Store;

/// A store viewed through its JSON representation.
///
/// Implemented for every [`Store<T>`] whose value type round-trips through
/// serde. Custom cell types may implement it directly to participate in
/// tracking.
pub trait StateCell: Send + Sync {
    /// Serialize the current value.
    fn snapshot(&self) -> Result<Value, BridgeError>;

    /// Deserialize a replayed value and write it into the cell,
    /// triggering the cell's own change notification.
    fn restore(&self, value: Value) -> Result<(), BridgeError>;

    /// Register a payload-free change callback.
    fn watch(&self, callback: Box<dyn Fn() + Send + Sync>) -> WatchHandle;
}

impl<T> StateCell for Store<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn snapshot(&self) -> Result<Value, BridgeError> {
        serde_json::to_value(self.get()).map_err(BridgeError::Encode)
    }

    fn restore(&self, value: Value) -> Result<(), BridgeError> {
        let typed: T = serde_json::from_value(value).map_err(BridgeError::Restore)?;
        self.set(typed);
        Ok(())
    }

    fn watch(&self, callback: Box<dyn Fn() + Send + Sync>) -> WatchHandle {
        let subscription = self.subscribe(move |_| callback());
        WatchHandle {
            release: Some(Box::new(move || subscription.unsubscribe())),
        }
    }
}

/// Handle that detaches a callback registered with [`StateCell::watch`].
pub struct WatchHandle {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchHandle {
    /// Build a handle from an arbitrary release action.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Detach the callback from its cell.
    pub fn unwatch(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.release.is_some())
            .finish()
    }
}
