//! Session adapters.
//!
//! The production session lives in the `websocket` adapter; this module holds
//! the in-memory double used by tests and local tooling.

mod in_memory;

pub use in_memory::InMemorySession;
