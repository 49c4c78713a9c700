//! Combined-state bridging: the whole store set behind one session
//!
//! The session sees a single JSON object keyed by store name. Any change
//! to any member triggers a full re-read of every store rather than an
//! incremental patch; at the handful-of-stores scale this bridge targets,
//! recomputing the union is simpler than tracking deltas.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::devtools::connector::{DevtoolsConnector, DevtoolsSession, SessionConfig};
use crate::devtools::protocol::{decode_replay, Action};
use crate::error::BridgeError;
use crate::store::erased::WatchHandle;
use crate::tracker::guard::ReplayGuard;
use crate::tracker::StoreMap;

/// Read every store and assemble the name-keyed union object.
pub(crate) fn combined_snapshot(stores: &StoreMap) -> Result<Value, BridgeError> {
    let mut combined = Map::new();
    for (name, store) in stores {
        combined.insert(name.clone(), store.snapshot()?);
    }
    Ok(Value::Object(combined))
}

/// Wire the full store set to one session under the given display name.
pub(crate) fn track_combined(
    name: &str,
    stores: &StoreMap,
    connector: &Arc<dyn DevtoolsConnector>,
    extension: &Map<String, Value>,
) -> Result<(Arc<dyn DevtoolsSession>, Vec<WatchHandle>), BridgeError> {
    let session = connector.connect(SessionConfig::new(name, extension.clone()));
    session.init(combined_snapshot(stores)?);
    tracing::debug!(session = %name, stores = stores.len(), "store set connected to devtools session");

    let guard = Arc::new(ReplayGuard::new());
    let shared: Arc<StoreMap> = Arc::new(stores.clone());

    let mut watches = Vec::with_capacity(stores.len());
    for store in stores.values() {
        let session = Arc::clone(&session);
        let stores = Arc::clone(&shared);
        let guard = Arc::clone(&guard);
        let name = name.to_string();
        watches.push(store.watch(Box::new(move || {
            if guard.is_applying() {
                return;
            }
            match combined_snapshot(&stores) {
                Ok(value) => {
                    tracing::trace!(session = %name, "forwarding combined state");
                    session.send(Action::update(), value);
                }
                Err(error) => {
                    tracing::warn!(session = %name, error = %error, "failed to encode combined state");
                }
            }
        })));
    }

    {
        let stores = Arc::clone(&shared);
        let guard = Arc::clone(&guard);
        let name = name.to_string();
        session.subscribe(Box::new(move |message| {
            // An empty replay state defaults to the empty object: every
            // store is then simply left untouched for that round.
            match decode_replay(message, Some("{}")) {
                Ok(Some(Value::Object(replayed))) => {
                    let _scope = guard.enter();
                    for (store_name, store) in stores.iter() {
                        let Some(value) = replayed.get(store_name) else {
                            continue;
                        };
                        if let Err(error) = store.restore(value.clone()) {
                            tracing::warn!(
                                session = %name,
                                store = %store_name,
                                error = %error,
                                "failed to apply replayed state"
                            );
                        }
                    }
                }
                Ok(Some(other)) => {
                    let error = BridgeError::StateShape(json_type_name(&other));
                    tracing::warn!(session = %name, error = %error, "dropping malformed replay message");
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(session = %name, error = %error, "dropping malformed replay message");
                }
            }
        }));
    }

    Ok((session, watches))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
