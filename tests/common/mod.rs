//! Shared utilities for integration tests.
//!
//! Provides an rstest fixture building an [`Engine`] over a scripted link and
//! the result alias used by fallible tests.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use std::sync::Arc;

use mooltilink::{Engine, EngineConfig, ListenerHandle};
use mooltilink_testing::{LinkTap, RecordingListener, ScriptedLink};

/// Shared result type for fallible tests.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// An engine wired to a scripted link and a recording listener.
pub struct Harness {
    pub engine: Engine<ScriptedLink>,
    pub tap: LinkTap,
    pub listener: Arc<RecordingListener>,
}

/// Build a [`Harness`] after letting `script` configure the link.
pub fn harness(
    config: EngineConfig,
    script: impl FnOnce(ScriptedLink) -> ScriptedLink,
) -> TestResult<Harness> {
    let listener = RecordingListener::shared();
    let (link, events) = ScriptedLink::new();
    let link = script(link);
    let tap = link.tap();
    let engine = Engine::new(link, events, ListenerHandle::new(&listener), config)?;
    Ok(Harness {
        engine,
        tap,
        listener,
    })
}
