//! Application layer - Services that coordinate ports.
//!
//! The broadcast hub is the only service: it owns the sequence counter and
//! drives the session registry and delay scheduler.

pub mod broadcast_hub;

pub use broadcast_hub::{
    BroadcastHub, BroadcastReport, HubSettings, MessageOutcome, DEFAULT_DELAYED_SUFFIX,
    DEFAULT_REBROADCAST_DELAY, DEFAULT_STOP_COMMAND,
};
