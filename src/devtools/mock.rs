//! Mock monitor for deterministic testing
//!
//! Implements the connector and session traits without any external
//! monitor. Every interaction is captured for later verification, and
//! tests drive the inbound direction by dispatching messages to captured
//! sessions.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use storescope::devtools::mock::MockConnector;
//! use storescope::devtools::{DevtoolsConnector, SessionConfig};
//!
//! let connector = Arc::new(MockConnector::new());
//! let session = connector.connect(SessionConfig::new("stores.count", Default::default()));
//! session.init(serde_json::json!(0));
//!
//! let opened = connector.sessions();
//! assert_eq!(opened[0].name(), "stores.count");
//! assert_eq!(opened[0].inits(), vec![serde_json::json!(0)]);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::devtools::connector::{
    DevtoolsConnector, DevtoolsSession, MonitorHandler, SessionConfig,
};
use crate::devtools::protocol::{Action, MonitorMessage};

/// Mock connector that records every session it opens.
#[derive(Default)]
pub struct MockConnector {
    sessions: Mutex<Vec<Arc<MockSession>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// All sessions opened so far, in creation order.
    pub fn sessions(&self) -> Vec<Arc<MockSession>> {
        self.sessions.lock().clone()
    }

    /// Number of `connect` calls observed.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Find a session by its display name.
    pub fn session_named(&self, name: &str) -> Option<Arc<MockSession>> {
        self.sessions
            .lock()
            .iter()
            .find(|s| s.config.name == name)
            .cloned()
    }
}

impl DevtoolsConnector for MockConnector {
    fn connect(&self, config: SessionConfig) -> Arc<dyn DevtoolsSession> {
        let session = Arc::new(MockSession::new(config));
        self.sessions.lock().push(Arc::clone(&session));
        session
    }
}

/// Mock session capturing all outbound traffic.
///
/// Inbound traffic is simulated with [`MockSession::dispatch`], which
/// synchronously invokes every subscribed handler the way a real monitor
/// delivers messages within the host's callback dispatch.
pub struct MockSession {
    config: SessionConfig,
    inits: Mutex<Vec<Value>>,
    sends: Mutex<Vec<(Action, Value)>>,
    handlers: Mutex<Vec<Arc<dyn Fn(&MonitorMessage) + Send + Sync>>>,
    unsubscribed: Mutex<bool>,
}

impl MockSession {
    fn new(config: SessionConfig) -> Self {
        Self {
            config,
            inits: Mutex::new(Vec::new()),
            sends: Mutex::new(Vec::new()),
            handlers: Mutex::new(Vec::new()),
            unsubscribed: Mutex::new(false),
        }
    }

    /// Display name this session was opened under.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The pass-through config this session was opened with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Captured `init` values, in call order.
    pub fn inits(&self) -> Vec<Value> {
        self.inits.lock().clone()
    }

    /// Captured `send` calls, in call order.
    pub fn sends(&self) -> Vec<(Action, Value)> {
        self.sends.lock().clone()
    }

    /// Values of captured `update` sends only.
    pub fn sent_updates(&self) -> Vec<Value> {
        self.sends
            .lock()
            .iter()
            .filter(|(action, _)| *action == Action::update())
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Whether `unsubscribe` was called.
    pub fn was_unsubscribed(&self) -> bool {
        *self.unsubscribed.lock()
    }

    /// Deliver a monitor message to every subscribed handler.
    pub fn dispatch(&self, message: &MonitorMessage) {
        // Snapshot so no lock is held while handlers run; a handler may
        // send on this very session.
        let handlers: Vec<_> = self.handlers.lock().iter().cloned().collect();
        for handler in handlers {
            handler(message);
        }
    }

    /// Forget captured traffic, keeping subscriptions intact.
    pub fn reset(&self) {
        self.inits.lock().clear();
        self.sends.lock().clear();
    }
}

impl DevtoolsSession for MockSession {
    fn init(&self, state: Value) {
        self.inits.lock().push(state);
    }

    fn send(&self, action: Action, state: Value) {
        self.sends.lock().push((action, state));
    }

    fn subscribe(&self, handler: MonitorHandler) {
        self.handlers.lock().push(Arc::from(handler));
    }

    fn unsubscribe(&self) {
        *self.unsubscribed.lock() = true;
        self.handlers.lock().clear();
    }
}
