//! In-memory session implementation for testing.
//!
//! Records every frame sent to it so tests can assert on delivery.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in production.
//! It uses `.expect()` on lock operations which will panic if locks are poisoned.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::broadcast::ConnectionError;
use crate::domain::foundation::SessionId;
use crate::ports::Session;

/// In-memory session that captures outbound frames.
///
/// Features:
/// - Captures sent text for assertions
/// - Can be put in "always fail" mode to simulate a broken peer
/// - Can be disconnected to simulate the peer going away
///
/// # Example
///
/// ```ignore
/// let session = Arc::new(InMemorySession::new());
/// hub.on_open(session.clone()).await?;
/// hub.on_message(&*session, "hi").await;
///
/// assert_eq!(session.sent(), vec!["hi"]);
/// ```
pub struct InMemorySession {
    id: SessionId,
    open: AtomicBool,
    fail_sends: AtomicBool,
    sent: Mutex<Vec<String>>,
    close_calls: AtomicUsize,
}

impl InMemorySession {
    /// Creates an open session with a random id.
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    /// Creates an open session with the given id.
    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            open: AtomicBool::new(true),
            fail_sends: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            close_calls: AtomicUsize::new(0),
        }
    }

    /// Creates an open session whose every send fails.
    pub fn failing() -> Self {
        let session = Self::new();
        session.fail_sends.store(true, Ordering::SeqCst);
        session
    }

    // === Test Helpers ===

    /// Returns all frames sent so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("InMemorySession: sent lock poisoned")
            .clone()
    }

    /// Returns count of frames sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn sent_count(&self) -> usize {
        self.sent
            .lock()
            .expect("InMemorySession: sent lock poisoned")
            .len()
    }

    /// Number of times `close` was called.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Simulates the peer dropping the connection.
    pub fn disconnect(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

impl Default for InMemorySession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Session for InMemorySession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn send(&self, text: &str) -> Result<(), ConnectionError> {
        if !self.is_open() {
            return Err(ConnectionError::closed(self.id));
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ConnectionError::send_failed(self.id, "simulated send failure"));
        }
        self.sent
            .lock()
            .expect("InMemorySession: sent lock poisoned")
            .push(text.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }
}
