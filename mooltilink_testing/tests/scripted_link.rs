//! Tests for the scripted link and recording listener.

use std::{io, sync::Arc};

use bytes::Bytes;
use mooltilink::{
    credential::Credentials,
    link::{Link, LinkEvent},
    listener::DeviceListener,
};
use mooltilink_testing::{
    ListenerEvent,
    RecordingListener,
    ScriptedLink,
    fragments,
    recording_listener,
};
use rstest::rstest;

#[tokio::test]
async fn reads_follow_the_script_then_fall_back_to_empty() {
    let (link, mut events) = ScriptedLink::new();
    let mut link = link.with_reads([Bytes::from_static(&[1, 2])]);
    let tap = link.tap();

    link.request_read().await.expect("read");
    link.request_read().await.expect("read");

    assert_eq!(
        events.recv().await,
        Some(LinkEvent::Notification(Bytes::from_static(&[1, 2])))
    );
    assert_eq!(events.recv().await, Some(LinkEvent::Notification(Bytes::new())));
    assert_eq!(tap.read_requests(), 2);
}

#[tokio::test]
async fn writes_are_recorded_and_acknowledged() {
    let (link, mut events) = ScriptedLink::new();
    let mut link = link.with_write_ack(Err("busy".into()));
    let tap = link.tap();

    link.write(Bytes::from_static(&[9])).await.expect("write");
    link.write(Bytes::from_static(&[8])).await.expect("write");

    assert_eq!(events.recv().await, Some(LinkEvent::WriteAck(Err("busy".into()))));
    assert_eq!(events.recv().await, Some(LinkEvent::WriteAck(Ok(()))));
    assert_eq!(tap.writes(), [Bytes::from_static(&[9]), Bytes::from_static(&[8])]);
}

#[tokio::test]
async fn failing_writes_are_not_recorded() {
    let (link, _events) = ScriptedLink::new();
    let mut link = link.with_failing_writes(io::ErrorKind::NotConnected);
    let tap = link.tap();

    let err = link.write(Bytes::from_static(&[1])).await.expect_err("fails");

    assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    assert!(tap.writes().is_empty());
}

#[tokio::test]
async fn exhausted_script_can_disconnect() {
    let (link, mut events) = ScriptedLink::new();
    let mut link = link.disconnect_when_exhausted();

    link.request_read().await.expect("read");

    assert_eq!(events.recv().await, Some(LinkEvent::Disconnected));
}

#[test]
fn credential_payload_decodes() {
    let payload = fragments::credential_payload("alice", "s3cret");
    let credentials = Credentials::parse(&payload).expect("decodes");
    assert_eq!(credentials.username, "alice");
    assert_eq!(credentials.password, "s3cret");
}

#[rstest]
fn recording_listener_keeps_arrival_order(recording_listener: Arc<RecordingListener>) {
    let listener: Arc<dyn DeviceListener> = recording_listener.clone();

    listener.connected();
    listener.locked_status_changed(true);
    listener.on_error("boom");

    assert_eq!(
        recording_listener.take(),
        [
            ListenerEvent::Connected,
            ListenerEvent::Locked(true),
            ListenerEvent::Error("boom".into()),
        ]
    );
    assert!(recording_listener.events().is_empty());
}
