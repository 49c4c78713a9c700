//! End-to-end tracking: session naming, forwarding, gating, teardown

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use storescope::devtools::mock::MockConnector;
use storescope::{track_stores, DevtoolsHost, StateCell, Store, TrackerOptions};

use super::common::{cell, init_tracing, mock_host, stores_of, LoggingCell, LoggingConnector};

#[test]
fn readme_scenario_count_store() {
    // stores = {count: Store(0)}, default options.
    let count = Store::new(0_i64);
    let stores = stores_of(vec![("count", cell(&count))]);
    let (connector, host) = mock_host();

    let handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();

    let session = connector.session_named("stores.count").unwrap();
    assert_eq!(session.inits(), vec![json!(0)]);

    count.set(5);
    assert_eq!(session.sends().len(), 1);
    assert_eq!(session.sent_updates(), vec![json!(5)]);

    handle.stop();
}

#[test]
fn each_store_gets_its_own_session() {
    let name = Store::new(String::from("John"));
    let age = Store::new(0_i64);
    let stores = stores_of(vec![("name", cell(&name)), ("age", cell(&age))]);
    let (connector, host) = mock_host();

    let handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    assert_eq!(connector.session_count(), 2);

    // Changes are routed to the owning session only.
    age.set(30);
    assert_eq!(
        connector.session_named("stores.age").unwrap().sent_updates(),
        vec![json!(30)]
    );
    assert!(connector
        .session_named("stores.name")
        .unwrap()
        .sent_updates()
        .is_empty());

    handle.stop();
}

#[test]
fn echo_law_one_set_one_send() {
    let count = Store::new(0_i64);
    let stores = stores_of(vec![("count", cell(&count))]);
    let (connector, host) = mock_host();

    let _handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    let session = connector.session_named("stores.count").unwrap();

    count.set(1);
    count.set(2);
    count.set(3);

    assert_eq!(session.sent_updates(), vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn release_build_never_connects() {
    init_tracing();
    let count = Store::new(0_i64);
    let stores = stores_of(vec![("count", cell(&count))]);

    let connector = Arc::new(MockConnector::new());
    let host = DevtoolsHost::new(connector.clone()).with_release_build(true);

    let handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    assert_eq!(connector.session_count(), 0);
    assert!(!handle.is_active());

    // The store works untouched and the inert teardown is safe.
    count.set(1);
    handle.stop();
    assert_eq!(count.get(), 1);
}

#[test]
fn disabled_host_never_touches_stores() {
    init_tracing();
    let count = Store::new(0_i64);
    let stores = stores_of(vec![("count", cell(&count))]);

    let handle = track_stores(&stores, TrackerOptions::default(), &DevtoolsHost::disabled())
        .unwrap();
    assert!(!handle.is_active());
    assert_eq!(count.listener_count(), 0);
    handle.stop();
}

#[test]
fn stop_detaches_every_listener() {
    let name = Store::new(String::new());
    let age = Store::new(0_i64);
    let stores = stores_of(vec![("name", cell(&name)), ("age", cell(&age))]);
    let (connector, host) = mock_host();

    let handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    assert_eq!(name.listener_count(), 1);
    assert_eq!(age.listener_count(), 1);

    handle.stop();

    assert_eq!(name.listener_count(), 0);
    assert_eq!(age.listener_count(), 0);
    for session in connector.sessions() {
        assert!(session.was_unsubscribed());
    }
}

#[test]
fn stop_unsubscribes_sessions_before_watches_in_creation_order() {
    init_tracing();
    let log = Arc::new(Mutex::new(Vec::new()));
    let mock = Arc::new(MockConnector::new());
    let connector = Arc::new(LoggingConnector::new(mock, Arc::clone(&log)));
    let host = DevtoolsHost::new(connector).with_release_build(false);

    let a = Store::new(0_i64);
    let b = Store::new(0_i64);
    let stores = stores_of(vec![
        (
            "a",
            Arc::new(LoggingCell::new(cell(&a), "a", Arc::clone(&log))) as Arc<dyn StateCell>,
        ),
        (
            "b",
            Arc::new(LoggingCell::new(cell(&b), "b", Arc::clone(&log))) as Arc<dyn StateCell>,
        ),
    ]);

    let handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();
    handle.stop();

    assert_eq!(
        *log.lock(),
        vec!["session:stores.a", "session:stores.b", "watch:a", "watch:b"]
    );
}

#[test]
fn tracking_units_do_not_share_guards() {
    // A replay into one store must not suppress forwarding from another.
    let a = Store::new(0_i64);
    let b = Store::new(0_i64);
    let stores = stores_of(vec![("a", cell(&a)), ("b", cell(&b))]);
    let (connector, host) = mock_host();

    let _handle = track_stores(&stores, TrackerOptions::default(), &host).unwrap();

    let session_a = connector.session_named("stores.a").unwrap();
    let session_b = connector.session_named("stores.b").unwrap();

    session_a.dispatch(&storescope::MonitorMessage::jump_to_state("5"));
    b.set(1);

    assert!(session_a.sent_updates().is_empty());
    assert_eq!(session_b.sent_updates(), vec![json!(1)]);
}
