//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the hub to the outside world:
//! - `registry` - In-memory session registry
//! - `scheduler` - Tokio-backed delay scheduler
//! - `session` - In-memory session double
//! - `websocket` - Axum WebSocket transport
//! - `http` - Router, shared state, health endpoint

pub mod http;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod websocket;

pub use registry::InMemorySessionRegistry;
pub use scheduler::TokioDelayScheduler;
pub use session::InMemorySession;
pub use websocket::WebSocketSession;
