//! Bridge reactive stores to a time-travel debugging monitor.
//!
//! `storescope` mirrors the values of named [`Store`]s into an external
//! devtools monitor and lets the monitor replay recorded values back into
//! them. The bridge is pure glue: subscribe, forward, and a per-unit
//! reentrancy guard that keeps monitor-originated writes from echoing
//! back to the monitor.
//!
//! The monitor is injected as a capability ([`DevtoolsHost`]) rather than
//! discovered from ambient globals, so tracking is deterministic to test
//! and trivially disabled: a host without a connector, or one flagged as
//! a release build, turns [`track_stores`] into a no-op.
//!
//! ```
//! use std::sync::Arc;
//! use storescope::devtools::mock::MockConnector;
//! use storescope::{DevtoolsHost, Store, StoreMap, TrackerOptions};
//!
//! let name = Store::new(String::from("John"));
//! let age = Store::new(0_i64);
//!
//! let mut stores = StoreMap::new();
//! stores.insert("name".to_string(), Arc::new(name.clone()) as _);
//! stores.insert("age".to_string(), Arc::new(age.clone()) as _);
//!
//! let connector = Arc::new(MockConnector::new());
//! let host = DevtoolsHost::new(connector).with_release_build(false);
//!
//! let handle = storescope::track_stores(
//!     &stores,
//!     TrackerOptions::default().with_prefix("myApp").one_state(),
//!     &host,
//! )?;
//! // ... the monitor now mirrors both stores as one state object ...
//! handle.stop();
//! # Ok::<(), storescope::BridgeError>(())
//! ```

pub mod devtools;
pub mod error;
pub mod store;
pub mod tracker;

pub use devtools::{
    Action, DevtoolsConnector, DevtoolsHost, DevtoolsSession, MessageKind, MonitorHandler,
    MonitorMessage, MonitorPayload, PayloadKind, SessionConfig,
};
pub use error::BridgeError;
pub use store::{StateCell, Store, StoreSubscription, WatchHandle};
pub use tracker::{track_stores, StoreMap, TrackerHandle, TrackerOptions};
