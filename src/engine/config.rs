//! Engine configuration.
//!
//! [`EngineConfig`] collects the tunables of the protocol engine. Defaults
//! match the device: 64-byte fragments, five retries per operation and a
//! five-second wait for each link event.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    fragment::{DEFAULT_FRAGMENT_SIZE, HEADER_LEN},
    retry::DEFAULT_MAX_RETRIES,
};

/// Default wait for a single link event.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default cap on reads spent draining stale notifications.
pub const DEFAULT_MAX_FLUSH_READS: usize = 64;

/// Rejected configuration values.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Fragments must have room for a body after the header.
    #[error("fragment size {0} must exceed the {HEADER_LEN}-byte header")]
    FragmentSize(usize),
    /// A flush needs at least two reads to compare.
    #[error("max flush reads {0} must be at least 2")]
    FlushReads(usize),
    /// A zero timeout would expire before any event could arrive.
    #[error("response timeout must be non-zero")]
    ZeroTimeout,
}

/// Tunables for the protocol engine.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use mooltilink::engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_max_retries(3)
///     .with_response_timeout(Some(Duration::from_secs(1)));
/// assert!(config.validate().is_ok());
/// assert!(EngineConfig::default().with_fragment_size(2).validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fragment size in bytes, header included.
    pub fragment_size: usize,
    /// Retry signals honoured per operation.
    pub max_retries: u8,
    /// Wait for each link event; `None` waits indefinitely.
    pub response_timeout: Option<Duration>,
    /// Reads a single flush may consume before the operation fails.
    pub max_flush_reads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fragment_size: DEFAULT_FRAGMENT_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            response_timeout: Some(DEFAULT_RESPONSE_TIMEOUT),
            max_flush_reads: DEFAULT_MAX_FLUSH_READS,
        }
    }
}

impl EngineConfig {
    /// Set the fragment size, header included.
    #[must_use]
    pub fn with_fragment_size(mut self, fragment_size: usize) -> Self {
        self.fragment_size = fragment_size;
        self
    }

    /// Set how many retry signals an operation honours.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u8) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the wait for each link event; `None` disables the timeout.
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Set the read budget of a single flush.
    #[must_use]
    pub fn with_max_flush_reads(mut self, reads: usize) -> Self {
        self.max_flush_reads = reads;
        self
    }

    /// Check that the values can drive an engine.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fragment_size <= HEADER_LEN {
            return Err(ConfigError::FragmentSize(self.fragment_size));
        }
        if self.max_flush_reads < 2 {
            return Err(ConfigError::FlushReads(self.max_flush_reads));
        }
        if self.response_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
