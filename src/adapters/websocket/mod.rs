//! WebSocket transport adapter.
//!
//! Owns the per-connection loop and translates socket events into hub
//! lifecycle calls.
//!
//! # Architecture
//!
//! ```text
//!  client ──frame──▶ reader task ──on_message──▶ BroadcastHub
//!                                                   │ snapshot
//!                                                   ▼
//!  client ◀──frame── writer task ◀──mpsc── WebSocketSession::send
//! ```
//!
//! # Components
//!
//! - [`session`] - `Session` implementation over an outbound queue
//! - [`handler`] - Axum WebSocket upgrade handler and router

pub mod handler;
pub mod session;

pub use handler::{websocket_router, ws_handler, BROADCAST_PATH};
pub use session::WebSocketSession;
