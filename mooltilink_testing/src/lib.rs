//! Utilities for driving a [`mooltilink::Engine`] without a device.
//!
//! [`ScriptedLink`] answers read requests from a queue of canned
//! notifications and acknowledges writes, while [`RecordingListener`]
//! captures every callback for assertions.
//!
//! ```rust
//! use mooltilink::{Engine, EngineConfig, ListenerHandle, message::Command};
//! use mooltilink_testing::{RecordingListener, ScriptedLink, fragments};
//!
//! # async fn example() {
//! let listener = RecordingListener::shared();
//! let (link, events) = ScriptedLink::new();
//! let link = link
//!     .with_reads(fragments::flush_reads())
//!     .with_reads(fragments::response(Command::Status, &[0x05]));
//! let mut engine = Engine::new(
//!     link,
//!     events,
//!     ListenerHandle::new(&listener),
//!     EngineConfig::default(),
//! )
//! .unwrap();
//! engine.request_status().await.unwrap();
//! # }
//! ```

pub mod fragments;
pub mod link;
pub mod listener;
pub mod logging;
mod macros;

pub use link::{LinkTap, ScriptedLink};
pub use listener::{ListenerEvent, RecordingListener, recording_listener};
pub use logging::{LoggerHandle, logger};
