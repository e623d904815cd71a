//! Domain layer containing the broadcast vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps)
//! - `broadcast` - Messages, pending rebroadcasts and broadcast errors

pub mod broadcast;
pub mod foundation;
