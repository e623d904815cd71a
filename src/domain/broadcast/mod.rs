//! Broadcast domain module.
//!
//! Value objects exchanged between the hub, the session registry and the
//! delay scheduler, plus the error taxonomy for per-session and per-job
//! failures. None of these failures is fatal to the process.

mod errors;
mod message;

pub use errors::{ConnectionError, JobError, RegistryError};
pub use message::{BroadcastMessage, PendingRebroadcast};
