//! Ports to the external devtools monitor
//!
//! The bridge never probes ambient globals for a monitor. Instead the
//! caller hands it a [`DevtoolsHost`]: a capability that either carries a
//! connector to a real monitor or nothing at all. An absent connector or
//! a release build disables tracking entirely.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::devtools::protocol::{Action, MonitorMessage};

/// Handler invoked for every message the monitor pushes to a session.
pub type MonitorHandler = Box<dyn Fn(&MonitorMessage) + Send + Sync>;

/// Configuration handed to [`DevtoolsConnector::connect`].
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Display name of the session in the monitor UI
    pub name: String,
    /// Opaque monitor options, forwarded verbatim and never inspected
    pub extension: Map<String, Value>,
}

impl SessionConfig {
    pub fn new(name: impl Into<String>, extension: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            extension,
        }
    }
}

/// Entry point into the monitor: opens debug sessions.
pub trait DevtoolsConnector: Send + Sync {
    /// Open a session under the given display name and pass-through config.
    fn connect(&self, config: SessionConfig) -> Arc<dyn DevtoolsSession>;
}

/// One live debug session in the monitor.
pub trait DevtoolsSession: Send + Sync {
    /// Seed the session with the tracked unit's initial state.
    fn init(&self, state: Value);

    /// Forward a state change to the monitor.
    fn send(&self, action: Action, state: Value);

    /// Register a handler for messages pushed by the monitor.
    fn subscribe(&self, handler: MonitorHandler);

    /// Tear down the session and stop delivering messages.
    fn unsubscribe(&self);
}

/// The environment capability gating all tracking.
///
/// Tracking runs only when a connector is present and the host is not
/// flagged as a release build. The flag defaults to the compile profile
/// (`cfg!(not(debug_assertions))`), matching the convention that
/// time-travel debugging is a development-only facility; it can be
/// overridden for tests or unusual setups.
#[derive(Clone)]
pub struct DevtoolsHost {
    connector: Option<Arc<dyn DevtoolsConnector>>,
    release_build: bool,
}

impl DevtoolsHost {
    /// A host with a monitor attached, release-gated by the compile profile.
    pub fn new(connector: Arc<dyn DevtoolsConnector>) -> Self {
        Self {
            connector: Some(connector),
            release_build: cfg!(not(debug_assertions)),
        }
    }

    /// A host with no monitor: every `track_stores` call is a no-op.
    pub fn disabled() -> Self {
        Self {
            connector: None,
            release_build: cfg!(not(debug_assertions)),
        }
    }

    /// Override the release-build flag.
    pub fn with_release_build(mut self, release_build: bool) -> Self {
        self.release_build = release_build;
        self
    }

    /// The connector, unless tracking is gated off.
    pub(crate) fn active_connector(&self) -> Option<&Arc<dyn DevtoolsConnector>> {
        if self.release_build {
            return None;
        }
        self.connector.as_ref()
    }
}

impl std::fmt::Debug for DevtoolsHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevtoolsHost")
            .field("connector", &self.connector.is_some())
            .field("release_build", &self.release_build)
            .finish()
    }
}
