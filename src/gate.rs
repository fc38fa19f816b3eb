//! Single-slot gate serialising request/response cycles on the link.
//!
//! The link can only carry one write/notify round-trip at a time. Callers
//! [`acquire`](TransportGate::acquire) a [`GatePermit`] before writing or
//! requesting a read and give it back once the resulting notification has
//! been consumed. The permit is a move-only token: releasing consumes it and
//! dropping it releases it, so every acquisition is matched by exactly one
//! release on every path, including early returns and errors.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Cloneable handle to the link's binary gate.
#[derive(Clone, Debug)]
pub struct TransportGate {
    slot: Arc<Mutex<()>>,
}

impl Default for TransportGate {
    fn default() -> Self { Self::new() }
}

impl TransportGate {
    /// Create an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(())),
        }
    }

    /// Wait until the link is free and take the gate.
    ///
    /// # Examples
    ///
    /// ```
    /// use mooltilink::gate::TransportGate;
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
    /// let gate = TransportGate::new();
    /// let permit = gate.acquire().await;
    /// assert!(!gate.is_free());
    /// permit.release();
    /// assert!(gate.is_free());
    /// # });
    /// ```
    pub async fn acquire(&self) -> GatePermit {
        GatePermit {
            guard: Arc::clone(&self.slot).lock_owned().await,
        }
    }

    /// Take the gate if it is currently free.
    #[must_use]
    pub fn try_acquire(&self) -> Option<GatePermit> {
        Arc::clone(&self.slot)
            .try_lock_owned()
            .ok()
            .map(|guard| GatePermit { guard })
    }

    /// Whether no cycle currently holds the gate.
    #[must_use]
    pub fn is_free(&self) -> bool { self.slot.try_lock().is_ok() }
}

/// Proof that the holder owns the link for one cycle.
///
/// The gate reopens when the permit is released or dropped.
#[derive(Debug)]
#[must_use = "dropping the permit immediately releases the gate"]
pub struct GatePermit {
    guard: OwnedMutexGuard<()>,
}

impl GatePermit {
    /// Reopen the gate. Equivalent to dropping the permit, but explicit at
    /// call sites that hand the link to the next cycle.
    pub fn release(self) { drop(self.guard); }
}
