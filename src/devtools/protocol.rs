//! Wire shapes spoken with the devtools monitor
//!
//! The monitor protocol is external: this module only models the subset
//! the bridge produces (the `update` action descriptor) and consumes
//! (dispatch messages that request a state jump). Unknown kinds are kept
//! deserializable so unrecognized traffic can be ignored instead of
//! failing the subscription.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

/// Action descriptor accompanying a value forwarded to the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Action {
    /// The descriptor sent with every forwarded store change.
    pub fn update() -> Self {
        Self {
            kind: "update".to_string(),
        }
    }
}

/// Top-level kind of an inbound monitor message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    Dispatch,
    Start,
    Action,
    /// Forward compatibility: anything the bridge does not recognize
    #[serde(other)]
    Unknown,
}

/// Kind of the nested payload of a `DISPATCH` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadKind {
    JumpToState,
    JumpToAction,
    Reset,
    Commit,
    Rollback,
    #[serde(other)]
    Unknown,
}

/// Nested payload of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorPayload {
    #[serde(rename = "type")]
    pub kind: PayloadKind,
}

/// A message pushed by the monitor to a session subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<MonitorPayload>,
    /// Serialized JSON of the state to replay, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl MonitorMessage {
    /// A `DISPATCH` message requesting a jump to a serialized state.
    pub fn jump_to_state(state: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Dispatch,
            payload: Some(MonitorPayload {
                kind: PayloadKind::JumpToState,
            }),
            state: Some(state.into()),
        }
    }

    /// A `DISPATCH` message requesting a jump to the state of a recorded action.
    pub fn jump_to_action(state: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Dispatch,
            payload: Some(MonitorPayload {
                kind: PayloadKind::JumpToAction,
            }),
            state: Some(state.into()),
        }
    }
}

/// Extract the replay payload from an inbound message, if it carries one.
///
/// A message is actionable only if its kind is `DISPATCH`, it carries a
/// `state` field, and its payload requests `JUMP_TO_STATE` or
/// `JUMP_TO_ACTION`. Everything else decodes to `Ok(None)` and is ignored
/// by callers. An actionable message with an empty `state` string falls
/// back to `fallback` as the serialized form; with no fallback that is an
/// error, as is malformed JSON in the `state` field.
pub fn decode_replay(
    message: &MonitorMessage,
    fallback: Option<&str>,
) -> Result<Option<Value>, BridgeError> {
    if message.kind != MessageKind::Dispatch {
        return Ok(None);
    }
    let Some(state) = message.state.as_deref() else {
        return Ok(None);
    };
    let jump = matches!(
        message.payload.map(|p| p.kind),
        Some(PayloadKind::JumpToState) | Some(PayloadKind::JumpToAction)
    );
    if !jump {
        return Ok(None);
    }

    let raw = if state.is_empty() {
        fallback.ok_or(BridgeError::MissingState)?
    } else {
        state
    };
    serde_json::from_str(raw).map(Some).map_err(BridgeError::Decode)
}
