#![doc(html_root_url = "https://docs.rs/mooltilink/latest")]
//! Public API for the `mooltilink` library.
//!
//! This crate implements the host side of a hardware password manager's
//! fragmented notification protocol: reassembly of inbound fragments,
//! stale-notification flushing, response dispatch with bounded retries and
//! credential decoding, driven over an abstract [`Link`] by the [`Engine`].

pub mod byte_order;
pub mod credential;
pub mod dispatch;
pub mod engine;
pub mod flush;
pub mod fragment;
pub mod gate;
pub mod link;
pub mod listener;
pub mod message;
pub mod metrics;
pub mod retry;
pub mod session;

pub use credential::{Credentials, parse_field};
pub use dispatch::{DispatchOutcome, ResponseDispatcher};
pub use engine::{CycleOutcome, Engine, EngineConfig, EngineError};
pub use flush::{FlushCoordinator, FlushOutcome};
pub use fragment::{
    FragmentBatch,
    FragmentHeader,
    FragmentOutcome,
    FragmentationError,
    Fragmenter,
    PacketReassembler,
    ReassembledMessage,
};
pub use gate::{GatePermit, TransportGate};
pub use link::{Link, LinkEvent, event_channel};
pub use listener::{DeviceListener, ListenerHandle};
pub use message::{Command, DeviceCodec, Message, MessageDecoder, Request};
pub use metrics::{DESYNCS_TOTAL, Direction, ERRORS_TOTAL, FRAGMENTS_TOTAL, RETRIES_TOTAL};
pub use retry::RetryPolicy;
pub use session::ProtocolSession;
