//! Tracking orchestrator
//!
//! [`track_stores`] is the crate's public entry point: it wires a named
//! set of stores to a devtools monitor and hands back a [`TrackerHandle`]
//! that tears the whole arrangement down again. Everything it creates
//! lives and dies inside one call; nothing persists across calls.

mod combined;
mod guard;
mod single;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::devtools::connector::{DevtoolsHost, DevtoolsSession};
use crate::error::BridgeError;
use crate::store::erased::{StateCell, WatchHandle};

/// Session name used when the whole set is tracked as one state.
const COMBINED_SESSION_NAME: &str = "stores";

/// Prefix prepended to each store's name in per-store mode.
const PER_STORE_PREFIX: &str = "stores.";

/// Named set of stores handed to [`track_stores`].
///
/// A `BTreeMap` keeps iteration, and therefore session creation and
/// combined-object assembly, in deterministic name order.
pub type StoreMap = BTreeMap<String, Arc<dyn StateCell>>;

/// Recognized tracking options plus the opaque monitor pass-through.
#[derive(Debug, Clone, Default)]
pub struct TrackerOptions {
    /// Prefix of each session name in per-store mode (default `"stores."`),
    /// or the single session name in combined mode (default `"stores"`)
    pub prefix: Option<String>,
    /// Track the whole set as one combined state instead of one session
    /// per store
    pub has_one_state: bool,
    /// Monitor configuration forwarded verbatim to the connector; the
    /// bridge never inspects it
    pub extension: Map<String, Value>,
}

impl TrackerOptions {
    /// Override the session name prefix (or combined session name).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Track all stores as one combined state.
    pub fn one_state(mut self) -> Self {
        self.has_one_state = true;
        self
    }

    /// Attach pass-through monitor configuration.
    pub fn with_extension(mut self, extension: Map<String, Value>) -> Self {
        self.extension = extension;
        self
    }
}

/// Live tracking arrangement returned by [`track_stores`].
///
/// Stopping is the only supported way to end tracking, and consuming
/// `self` makes a second teardown unrepresentable. Dropping the handle
/// without stopping leaves the bridge attached for the life of the
/// stores and sessions.
pub struct TrackerHandle {
    sessions: Vec<Arc<dyn DevtoolsSession>>,
    watches: Vec<WatchHandle>,
}

impl std::fmt::Debug for TrackerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerHandle")
            .field("sessions", &self.sessions.len())
            .field("watches", &self.watches.len())
            .finish()
    }
}

impl TrackerHandle {
    fn inert() -> Self {
        Self {
            sessions: Vec::new(),
            watches: Vec::new(),
        }
    }

    /// Whether this handle is actually bridging anything.
    ///
    /// False when tracking was environment-gated into a no-op.
    pub fn is_active(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Number of debug sessions this call opened.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Tear everything down: unsubscribe every session in creation order,
    /// then release every store watch in creation order.
    pub fn stop(self) {
        tracing::debug!(
            sessions = self.sessions.len(),
            watches = self.watches.len(),
            "stopping store tracking"
        );
        for session in &self.sessions {
            session.unsubscribe();
        }
        for watch in self.watches {
            watch.unwatch();
        }
    }
}

/// Track a named set of stores in the devtools monitor carried by `host`.
///
/// When the host carries no monitor, or is flagged as a release build,
/// this is a complete no-op: no store is read, no session is opened, and
/// the returned handle tears down nothing. Otherwise each store gets its
/// own session named `prefix + name`, unless `has_one_state` is set, in
/// which case the whole set shares one session named `prefix` and the
/// monitor sees the union object keyed by store name.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use storescope::devtools::mock::MockConnector;
/// use storescope::{DevtoolsHost, Store, StoreMap, TrackerOptions};
///
/// let count = Store::new(0_i64);
/// let mut stores = StoreMap::new();
/// stores.insert("count".to_string(), Arc::new(count.clone()) as _);
///
/// let connector = Arc::new(MockConnector::new());
/// let host = DevtoolsHost::new(connector.clone()).with_release_build(false);
///
/// let handle = storescope::track_stores(&stores, TrackerOptions::default(), &host).unwrap();
/// count.set(5);
/// assert_eq!(
///     connector.session_named("stores.count").unwrap().sent_updates(),
///     vec![serde_json::json!(5)],
/// );
/// handle.stop();
/// ```
pub fn track_stores(
    stores: &StoreMap,
    options: TrackerOptions,
    host: &DevtoolsHost,
) -> Result<TrackerHandle, BridgeError> {
    let Some(connector) = host.active_connector() else {
        tracing::debug!("devtools tracking disabled, nothing to bridge");
        return Ok(TrackerHandle::inert());
    };

    let TrackerOptions {
        prefix,
        has_one_state,
        extension,
    } = options;

    let mut sessions = Vec::new();
    let mut watches = Vec::new();

    if has_one_state {
        let name = prefix.unwrap_or_else(|| COMBINED_SESSION_NAME.to_string());
        let (session, unit_watches) =
            combined::track_combined(&name, stores, connector, &extension)?;
        sessions.push(session);
        watches.extend(unit_watches);
    } else {
        let prefix = prefix.unwrap_or_else(|| PER_STORE_PREFIX.to_string());
        for (name, store) in stores {
            let (session, watch) =
                single::track_one_store(&format!("{prefix}{name}"), store, connector, &extension)?;
            sessions.push(session);
            watches.push(watch);
        }
    }

    Ok(TrackerHandle { sessions, watches })
}
