//! Per-store bridging: one store, one debug session

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::devtools::connector::{DevtoolsConnector, DevtoolsSession, SessionConfig};
use crate::devtools::protocol::{decode_replay, Action};
use crate::error::BridgeError;
use crate::store::erased::{StateCell, WatchHandle};
use crate::tracker::guard::ReplayGuard;

/// Wire one store to its own session under the given display name.
///
/// Outbound: every change made while the guard is idle is snapshotted and
/// forwarded as an `update`. Inbound: decoded replay values are written
/// back into the store under the guard, so the resulting notification is
/// suppressed instead of echoing to the monitor.
pub(crate) fn track_one_store(
    name: &str,
    store: &Arc<dyn StateCell>,
    connector: &Arc<dyn DevtoolsConnector>,
    extension: &Map<String, Value>,
) -> Result<(Arc<dyn DevtoolsSession>, WatchHandle), BridgeError> {
    let session = connector.connect(SessionConfig::new(name, extension.clone()));
    session.init(store.snapshot()?);
    tracing::debug!(session = %name, "store connected to devtools session");

    let guard = Arc::new(ReplayGuard::new());

    let watch = {
        let session = Arc::clone(&session);
        let watched = Arc::clone(store);
        let guard = Arc::clone(&guard);
        let name = name.to_string();
        store.watch(Box::new(move || {
            if guard.is_applying() {
                return;
            }
            match watched.snapshot() {
                Ok(value) => {
                    tracing::trace!(session = %name, "forwarding store update");
                    session.send(Action::update(), value);
                }
                Err(error) => {
                    tracing::warn!(session = %name, error = %error, "failed to encode store update");
                }
            }
        }))
    };

    {
        let store = Arc::clone(store);
        let guard = Arc::clone(&guard);
        let name = name.to_string();
        session.subscribe(Box::new(move |message| {
            match decode_replay(message, None) {
                Ok(Some(value)) => {
                    let _scope = guard.enter();
                    if let Err(error) = store.restore(value) {
                        tracing::warn!(session = %name, error = %error, "failed to apply replayed state");
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(session = %name, error = %error, "dropping malformed replay message");
                }
            }
        }));
    }

    Ok((session, watch))
}
