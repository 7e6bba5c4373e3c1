//! Integration tests for device selection and connection startup

use serimon_core::{
    select_port, ConnectionState, MonitorConfig, MonitorError, PortDescriptor, PortEnumerator,
    SerialMonitor,
};

/// Enumerator returning a fixed snapshot.
struct StaticEnumerator(Vec<PortDescriptor>);

impl PortEnumerator for StaticEnumerator {
    fn enumerate(&self) -> Vec<PortDescriptor> {
        self.0.clone()
    }
}

#[test]
fn selector_prefers_usb_over_bluetooth() {
    let enumerator = StaticEnumerator(vec![
        PortDescriptor::new("/dev/ttyACM0", "USB Serial"),
        PortDescriptor::new("/dev/rfcomm0", "Bluetooth"),
    ]);

    assert_eq!(
        select_port(None, &enumerator),
        Some("/dev/ttyACM0".to_string())
    );
}

#[test]
fn selector_falls_back_to_bluetooth() {
    let enumerator = StaticEnumerator(vec![PortDescriptor::new("/dev/rfcomm0", "Bluetooth")]);

    assert_eq!(
        select_port(None, &enumerator),
        Some("/dev/rfcomm0".to_string())
    );
}

#[test]
fn selector_returns_nothing_without_candidates() {
    assert_eq!(select_port(None, &StaticEnumerator(Vec::new())), None);
}

#[test]
fn explicit_port_is_returned_verbatim() {
    // No validation against the snapshot, even an empty one.
    assert_eq!(
        select_port(Some("/dev/custom"), &StaticEnumerator(Vec::new())),
        Some("/dev/custom".to_string())
    );
}

#[test]
fn connect_fails_when_nothing_is_found() {
    let mut monitor = SerialMonitor::with_enumerator(
        MonitorConfig::default(),
        Box::new(StaticEnumerator(Vec::new())),
    );

    assert!(matches!(
        monitor.connect(),
        Err(MonitorError::NoDeviceFound)
    ));
    assert_eq!(monitor.state(), ConnectionState::Disconnected);
}

#[test]
fn connect_reports_open_failure_for_a_missing_port() {
    let mut monitor = SerialMonitor::new(MonitorConfig::new(
        Some("this-port-does-not-exist".to_string()),
        9600,
    ));

    match monitor.connect() {
        Err(MonitorError::OpenFailed { port, .. }) => {
            assert_eq!(port, "this-port-does-not-exist");
        }
        other => panic!("expected an open failure, got {other:?}"),
    }
    assert!(!monitor.is_connected());
}

#[test]
fn close_is_idempotent_without_a_connection() {
    let mut monitor = SerialMonitor::with_enumerator(
        MonitorConfig::default(),
        Box::new(StaticEnumerator(Vec::new())),
    );

    monitor.close();
    assert_eq!(monitor.state(), ConnectionState::Disconnected);
    monitor.close();
    assert_eq!(monitor.state(), ConnectionState::Disconnected);
}

#[test]
fn read_without_a_connection_is_a_contract_violation() {
    let mut monitor = SerialMonitor::with_enumerator(
        MonitorConfig::default(),
        Box::new(StaticEnumerator(Vec::new())),
    );

    assert!(matches!(
        monitor.read_sample(),
        Err(MonitorError::NotConnected)
    ));
}
