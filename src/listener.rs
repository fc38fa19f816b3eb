//! Callback boundary towards the embedding application.
//!
//! The engine reports device events through a [`DeviceListener`]. It only
//! keeps a [`ListenerHandle`], a non-owning reference, so dropping the
//! application's listener silently stops delivery instead of keeping it alive.

use std::sync::{Arc, Weak};

/// Receives device events from the engine.
///
/// Callbacks run synchronously on the engine's task and should return
/// quickly.
pub trait DeviceListener: Send + Sync {
    /// The device reported its lock state.
    fn locked_status_changed(&self, locked: bool);

    /// A credential lookup succeeded.
    fn credentials_received(&self, username: &str, password: &str);

    /// An operation failed in a way the application should surface.
    fn on_error(&self, message: &str);

    /// The link is ready for requests.
    fn connected(&self) {}
}

/// Non-owning reference to a registered [`DeviceListener`].
#[derive(Clone, Default)]
pub struct ListenerHandle(Option<Weak<dyn DeviceListener>>);

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ListenerHandle")
            .field(&self.is_alive())
            .finish()
    }
}

impl ListenerHandle {
    /// Register `listener` without taking ownership of it.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mooltilink::listener::{DeviceListener, ListenerHandle};
    ///
    /// struct Quiet;
    /// impl DeviceListener for Quiet {
    ///     fn locked_status_changed(&self, _locked: bool) {}
    ///     fn credentials_received(&self, _username: &str, _password: &str) {}
    ///     fn on_error(&self, _message: &str) {}
    /// }
    ///
    /// let listener = Arc::new(Quiet);
    /// let handle = ListenerHandle::new(&listener);
    /// assert!(handle.is_alive());
    /// drop(listener);
    /// assert!(!handle.is_alive());
    /// ```
    #[must_use]
    pub fn new<L: DeviceListener + 'static>(listener: &Arc<L>) -> Self {
        let weak: Weak<L> = Arc::downgrade(listener);
        Self(Some(weak))
    }

    /// A handle that delivers nothing.
    #[must_use]
    pub const fn detached() -> Self { Self(None) }

    /// Whether the registered listener is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    fn with(&self, notify: impl FnOnce(&dyn DeviceListener)) {
        if let Some(listener) = self.0.as_ref().and_then(Weak::upgrade) {
            notify(listener.as_ref());
        }
    }

    pub(crate) fn locked_status_changed(&self, locked: bool) {
        self.with(|listener| listener.locked_status_changed(locked));
    }

    pub(crate) fn credentials_received(&self, username: &str, password: &str) {
        self.with(|listener| listener.credentials_received(username, password));
    }

    pub(crate) fn on_error(&self, message: &str) { self.with(|listener| listener.on_error(message)); }

    pub(crate) fn connected(&self) { self.with(|listener| listener.connected()); }
}
