//! Draining of stale notifications before a transaction.
//!
//! The notification channel can still hold a value queued by a previous
//! session and offers no "empty" signal. [`FlushCoordinator`] infers that the
//! queue has drained once two consecutive reads return byte-identical
//! fragments.

use bytes::Bytes;

/// Result of feeding one read into an active flush.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The read differed from its predecessor; issue another read.
    StillFlushing,
    /// Two consecutive reads matched; the link can be trusted.
    FlushComplete,
}

/// Tracks the last fragment seen while a flush is in progress.
#[derive(Clone, Debug, Default)]
pub struct FlushCoordinator {
    active: bool,
    last: Option<Bytes>,
    reads: usize,
}

impl FlushCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Start a new flush, forgetting any fragment from an earlier one.
    pub fn begin(&mut self) {
        self.active = true;
        self.last = None;
        self.reads = 0;
    }

    /// Whether a flush is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool { self.active }

    /// Number of reads consumed by the current flush.
    #[must_use]
    pub const fn reads(&self) -> usize { self.reads }

    /// Abandon any flush in progress.
    pub fn clear(&mut self) {
        self.active = false;
        self.last = None;
        self.reads = 0;
    }

    /// Compare `bytes` with the previous read.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use mooltilink::flush::{FlushCoordinator, FlushOutcome};
    ///
    /// let mut flush = FlushCoordinator::new();
    /// flush.begin();
    /// let stale = Bytes::from_static(&[0x00, 0x00, 0x01]);
    /// assert_eq!(flush.on_flush_fragment(stale.clone()), FlushOutcome::StillFlushing);
    /// assert_eq!(flush.on_flush_fragment(stale), FlushOutcome::FlushComplete);
    /// assert!(!flush.is_active());
    /// ```
    pub fn on_flush_fragment(&mut self, bytes: Bytes) -> FlushOutcome {
        self.reads = self.reads.saturating_add(1);
        match &self.last {
            Some(previous) if *previous == bytes => {
                self.clear();
                FlushOutcome::FlushComplete
            }
            _ => {
                self.last = Some(bytes);
                FlushOutcome::StillFlushing
            }
        }
    }
}
