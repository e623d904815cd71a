//! Session port - Handle to one connected client.
//!
//! The transport layer owns the actual connection; the hub only ever sees
//! this trait. Implementations must make `send` safe to call from any task,
//! including the scheduler's.

use async_trait::async_trait;

use crate::domain::broadcast::ConnectionError;
use crate::domain::foundation::SessionId;

/// One logical client connection.
#[async_trait]
pub trait Session: Send + Sync {
    /// Unique id of this session while it is connected.
    fn id(&self) -> SessionId;

    /// Liveness flag. `false` once the peer is gone or `close` was called.
    fn is_open(&self) -> bool;

    /// Send one text frame to the peer.
    ///
    /// Fails with `ConnectionError` if the peer is gone.
    async fn send(&self, text: &str) -> Result<(), ConnectionError>;

    /// Close the connection from the server side.
    ///
    /// Closing an already-closed session is not an error.
    async fn close(&self) -> Result<(), ConnectionError>;
}
