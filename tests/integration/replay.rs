//! Inbound replay: state jumps, non-actionable traffic, malformed payloads

use serde_json::json;
use storescope::{
    track_stores, MessageKind, MonitorMessage, MonitorPayload, PayloadKind, Store, TrackerOptions,
};

use super::common::{cell, mock_host, stores_of};

#[test]
fn jump_to_state_replays_without_echo() {
    let count = Store::new(0_i64);
    let stores = stores_of(vec![("count", cell(&count))]);
    let (connector, host) = mock_host();

    let _handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    let session = connector.session_named("stores.count").unwrap();

    session.dispatch(&MonitorMessage {
        kind: MessageKind::Dispatch,
        payload: Some(MonitorPayload {
            kind: PayloadKind::JumpToState,
        }),
        state: Some("7".to_string()),
    });

    assert_eq!(count.get(), 7);
    assert!(session.sent_updates().is_empty());
}

#[test]
fn jump_to_action_replays_too() {
    let count = Store::new(0_i64);
    let stores = stores_of(vec![("count", cell(&count))]);
    let (connector, host) = mock_host();

    let _handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    let session = connector.session_named("stores.count").unwrap();

    session.dispatch(&MonitorMessage::jump_to_action("12"));
    assert_eq!(count.get(), 12);
}

#[test]
fn replay_of_string_value() {
    let label = Store::new(String::from("before"));
    let stores = stores_of(vec![("label", cell(&label))]);
    let (connector, host) = mock_host();

    let _handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    let session = connector.session_named("stores.label").unwrap();

    session.dispatch(&MonitorMessage::jump_to_state(r#""X""#));
    assert_eq!(label.get(), "X");
    assert!(session.sent_updates().is_empty());
}

#[test]
fn non_actionable_messages_mutate_nothing() {
    let count = Store::new(3_i64);
    let stores = stores_of(vec![("count", cell(&count))]);
    let (connector, host) = mock_host();

    let _handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    let session = connector.session_named("stores.count").unwrap();

    // START message.
    session.dispatch(&MonitorMessage {
        kind: MessageKind::Start,
        payload: None,
        state: None,
    });
    // DISPATCH with a non-jump payload.
    session.dispatch(&MonitorMessage {
        kind: MessageKind::Dispatch,
        payload: Some(MonitorPayload {
            kind: PayloadKind::Reset,
        }),
        state: Some("0".to_string()),
    });
    // Jump payload without a state field.
    session.dispatch(&MonitorMessage {
        kind: MessageKind::Dispatch,
        payload: Some(MonitorPayload {
            kind: PayloadKind::JumpToState,
        }),
        state: None,
    });

    assert_eq!(count.get(), 3);
    assert!(session.sent_updates().is_empty());
}

#[test]
fn malformed_state_is_dropped_and_bridge_survives() {
    let count = Store::new(3_i64);
    let stores = stores_of(vec![("count", cell(&count))]);
    let (connector, host) = mock_host();

    let _handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    let session = connector.session_named("stores.count").unwrap();

    session.dispatch(&MonitorMessage::jump_to_state("{definitely not json"));
    assert_eq!(count.get(), 3);

    // The guard was never left held: local changes still forward.
    count.set(4);
    assert_eq!(session.sent_updates(), vec![json!(4)]);

    // And replays still apply.
    session.dispatch(&MonitorMessage::jump_to_state("5"));
    assert_eq!(count.get(), 5);
}

#[test]
fn replay_then_local_change_round_trip() {
    let count = Store::new(0_i64);
    let stores = stores_of(vec![("count", cell(&count))]);
    let (connector, host) = mock_host();

    let _handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    let session = connector.session_named("stores.count").unwrap();

    count.set(5);
    session.dispatch(&MonitorMessage::jump_to_state("7"));
    count.set(8);

    assert_eq!(count.get(), 8);
    // The replayed 7 never echoed; only the local writes did.
    assert_eq!(session.sent_updates(), vec![json!(5), json!(8)]);
}

#[test]
fn structured_values_replay() {
    #[derive(Clone, serde::Serialize, serde::Deserialize)]
    struct Profile {
        name: String,
        age: i64,
    }

    let profile = Store::new(Profile {
        name: "John".to_string(),
        age: 20,
    });
    let stores = stores_of(vec![("profile", cell(&profile))]);
    let (connector, host) = mock_host();

    let _handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    let session = connector.session_named("stores.profile").unwrap();

    session.dispatch(&MonitorMessage::jump_to_state(
        r#"{"name": "Jane", "age": 31}"#,
    ));

    let replayed = profile.get();
    assert_eq!(replayed.name, "Jane");
    assert_eq!(replayed.age, 31);
}
