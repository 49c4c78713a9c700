//! Devtools monitor ports and wire protocol

pub mod connector;
pub mod mock;
pub mod protocol;

pub use connector::{
    DevtoolsConnector, DevtoolsHost, DevtoolsSession, MonitorHandler, SessionConfig,
};
pub use protocol::{decode_replay, Action, MessageKind, MonitorMessage, MonitorPayload, PayloadKind};
