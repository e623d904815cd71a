//! Broadcast Hub - WebSocket fan-out with delayed rebroadcast
//!
//! Every text message a client sends is broadcast to all connected sessions,
//! then broadcast again with a " (delayed)" suffix after a short pause to
//! whoever is connected at that moment.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
