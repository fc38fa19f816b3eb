//! Connection lifecycle and gate sharing.

use std::sync::Arc;

use bytes::Bytes;
use mooltilink::{
    CycleOutcome,
    Engine,
    EngineConfig,
    EngineError,
    LinkEvent,
    ListenerHandle,
    TransportGate,
    message::Command,
};
use mooltilink_testing::{ListenerEvent, RecordingListener, ScriptedLink, fragments};
use tokio::task::yield_now;

mod common;

use common::{TestResult, harness};

#[tokio::test]
async fn wait_connected_notifies_listener() -> TestResult {
    let (link, events) = ScriptedLink::new();
    link.announce(LinkEvent::Notification(Bytes::new())).await;
    link.announce(LinkEvent::Connected).await;
    let listener = RecordingListener::shared();
    let mut engine = Engine::new(
        link,
        events,
        ListenerHandle::new(&listener),
        EngineConfig::default(),
    )?;

    engine.wait_connected().await?;

    assert_eq!(listener.take(), [ListenerEvent::Connected]);
    Ok(())
}

#[tokio::test]
async fn disconnect_before_connecting_is_an_error() -> TestResult {
    let h = harness(EngineConfig::default(), |link| link)?;
    h.engine.link().announce(LinkEvent::Disconnected).await;
    let mut engine = h.engine;

    let err = engine.wait_connected().await.expect_err("link went away");

    assert!(matches!(err, EngineError::LinkClosed));
    assert!(h.listener.take().is_empty());
    Ok(())
}

#[tokio::test]
async fn shared_gate_serialises_other_writers() -> TestResult {
    let gate = TransportGate::new();
    let h = harness(EngineConfig::default(), |link| {
        link.with_reads(fragments::flush_reads())
            .with_reads(fragments::response(Command::Ping, &[]))
    })?;
    let tap = h.tap.clone();
    let mut engine = h.engine.with_gate(gate.clone());

    let held = gate.acquire().await;
    let task = tokio::spawn(async move { engine.ping().await });
    yield_now().await;

    assert!(!task.is_finished());
    assert_eq!(tap.read_requests(), 0, "no read while another writer holds the gate");

    held.release();
    let outcome = task.await??;

    assert_eq!(outcome, CycleOutcome::Dispatched(Command::Ping));
    assert!(gate.is_free());
    Ok(())
}

#[tokio::test]
async fn dropped_listener_stops_delivery() -> TestResult {
    let mut h = harness(EngineConfig::default(), |link| {
        link.with_reads(fragments::flush_reads())
            .with_reads(fragments::response(Command::Status, &[0x00]))
    })?;
    let weak = Arc::downgrade(&h.listener);
    drop(h.listener);

    let outcome = h.engine.request_status().await?;

    assert_eq!(outcome, CycleOutcome::Dispatched(Command::Status));
    assert!(weak.upgrade().is_none());
    Ok(())
}
