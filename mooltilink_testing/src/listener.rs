//! A [`DeviceListener`] that records every callback.

use std::sync::{Arc, Mutex};

use mooltilink::listener::DeviceListener;
use rstest::fixture;

/// One recorded listener callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListenerEvent {
    Locked(bool),
    Credentials { username: String, password: String },
    Error(String),
    Connected,
}

/// Listener storing callbacks in arrival order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ListenerEvent>>,
}

impl RecordingListener {
    /// Create a listener ready to register with an engine.
    #[must_use]
    pub fn shared() -> Arc<Self> { Arc::new(Self::default()) }

    /// Callbacks recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the event log mutex is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<ListenerEvent> { self.log().clone() }

    /// Remove and return the recorded callbacks.
    ///
    /// # Panics
    ///
    /// Panics if the event log mutex is poisoned.
    pub fn take(&self) -> Vec<ListenerEvent> { std::mem::take(&mut *self.log()) }

    /// Recorded error messages only.
    ///
    /// # Panics
    ///
    /// Panics if the event log mutex is poisoned.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|event| match event {
                ListenerEvent::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<ListenerEvent>> {
        self.events.lock().expect("listener log poisoned")
    }
}

impl DeviceListener for RecordingListener {
    fn locked_status_changed(&self, locked: bool) { self.log().push(ListenerEvent::Locked(locked)); }

    fn credentials_received(&self, username: &str, password: &str) {
        self.log().push(ListenerEvent::Credentials {
            username: username.to_owned(),
            password: password.to_owned(),
        });
    }

    fn on_error(&self, message: &str) { self.log().push(ListenerEvent::Error(message.to_owned())); }

    fn connected(&self) { self.log().push(ListenerEvent::Connected); }
}

#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn recording_listener() -> Arc<RecordingListener> { RecordingListener::shared() }
