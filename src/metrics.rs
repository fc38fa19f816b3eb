//! Metric helpers for `mooltilink`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::counter;

use crate::message::Command;

/// Name of the counter tracking fragments moved over the link.
pub const FRAGMENTS_TOTAL: &str = "mooltilink_fragments_total";
/// Name of the counter tracking dispatched responses.
pub const RESPONSES_TOTAL: &str = "mooltilink_responses_total";
/// Name of the counter tracking abandoned reassemblies.
pub const DESYNCS_TOTAL: &str = "mooltilink_desyncs_total";
/// Name of the counter tracking device retry signals honoured.
pub const RETRIES_TOTAL: &str = "mooltilink_retries_total";
/// Name of the counter tracking completed flushes.
pub const FLUSHES_TOTAL: &str = "mooltilink_flushes_total";
/// Name of the counter tracking failed operations.
pub const ERRORS_TOTAL: &str = "mooltilink_errors_total";

/// Direction of fragment transfer.
#[derive(Clone, Copy, Debug)]
pub enum Direction {
    /// Fragments received from the device.
    Inbound,
    /// Fragments written to the device.
    Outbound,
}

impl Direction {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Record a fragment for the given direction.
pub fn inc_fragments(direction: Direction) {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_TOTAL, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record a dispatched response.
pub fn inc_responses(command: Command) {
    #[cfg(feature = "metrics")]
    counter!(RESPONSES_TOTAL, "command" => command.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = command;
}

/// Record an abandoned reassembly.
pub fn inc_desyncs() {
    #[cfg(feature = "metrics")]
    counter!(DESYNCS_TOTAL).increment(1);
}

/// Record an honoured retry signal.
pub fn inc_retries() {
    #[cfg(feature = "metrics")]
    counter!(RETRIES_TOTAL).increment(1);
}

/// Record a converged flush.
pub fn inc_flushes() {
    #[cfg(feature = "metrics")]
    counter!(FLUSHES_TOTAL).increment(1);
}

/// Record a failed operation, labelled by failure kind.
pub fn inc_errors(kind: &'static str) {
    #[cfg(feature = "metrics")]
    counter!(ERRORS_TOTAL, "kind" => kind).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = kind;
}
