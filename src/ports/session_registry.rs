//! SessionRegistry port - Tracks currently open sessions.
//!
//! ## Use Case
//!
//! 1. Client connects, transport adapter calls `register`
//! 2. Hub receives a message, takes a `snapshot` and sends to each entry
//! 3. Client disconnects, transport adapter calls `unregister`
//!
//! Registration and removal are each atomic. Nothing is atomic across
//! multiple calls.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::broadcast::RegistryError;
use crate::domain::foundation::SessionId;

use super::Session;

/// Port for tracking the set of live sessions.
///
/// Implementations must support concurrent calls from connection tasks and
/// scheduler tasks alike.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Add a session.
    ///
    /// Fails with `RegistryError::DuplicateSession` if a session with the same
    /// id is already registered.
    async fn register(&self, session: Arc<dyn Session>) -> Result<(), RegistryError>;

    /// Remove a session.
    ///
    /// Returns whether anything was removed. Removing an unknown id is a
    /// no-op, since teardown races are expected.
    async fn unregister(&self, session_id: &SessionId) -> bool;

    /// Copy of all registered sessions in registration order.
    ///
    /// Consistent at a single instant; the returned vec is independent of
    /// later registry mutations.
    async fn snapshot(&self) -> Vec<Arc<dyn Session>>;

    /// Number of registered sessions.
    async fn len(&self) -> usize;

    /// Check if no sessions are registered.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
