//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the broadcast hub and the outside world. Adapters implement these ports.
//!
//! - `Session` - Handle to one connected client, provided by the transport
//! - `SessionRegistry` - Set of live sessions, safe to enumerate
//! - `DelayScheduler` - Run-once delayed jobs with best-effort cancellation

mod delay_scheduler;
mod session;
mod session_registry;

pub use delay_scheduler::{DelayScheduler, DelayedCallback, ScheduleHandle};
pub use session::Session;
pub use session_registry::SessionRegistry;
