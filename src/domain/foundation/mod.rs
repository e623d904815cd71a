//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers and time values that form the vocabulary
//! of the broadcast domain.

mod ids;
mod timestamp;

pub use ids::{SequenceId, SessionId};
pub use timestamp::Timestamp;
