use thiserror::Error;

/// Errors produced while moving state across the bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A store value could not be serialized for the monitor
    #[error("failed to encode store state: {0}")]
    Encode(#[source] serde_json::Error),

    /// An inbound replay payload was not valid JSON
    #[error("failed to decode replay state: {0}")]
    Decode(#[source] serde_json::Error),

    /// An actionable replay message had an empty state and no fallback
    #[error("replay message carried no state payload")]
    MissingState,

    /// A combined replay payload was not the expected JSON object
    #[error("combined replay state must be a JSON object, got {0}")]
    StateShape(&'static str),

    /// A replay value did not match the store's value type
    #[error("replay value does not fit the store's value type: {0}")]
    Restore(#[source] serde_json::Error),
}
