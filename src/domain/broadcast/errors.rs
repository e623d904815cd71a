//! Broadcast-specific error types.

use thiserror::Error;

use crate::domain::foundation::SessionId;

/// A send to (or close of) one session failed.
///
/// Always scoped to that session: a broadcast round logs it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("session {session_id} is closed")]
    Closed { session_id: SessionId },

    #[error("send to session {session_id} failed: {reason}")]
    SendFailed { session_id: SessionId, reason: String },
}

impl ConnectionError {
    pub fn closed(session_id: SessionId) -> Self {
        ConnectionError::Closed { session_id }
    }

    pub fn send_failed(session_id: SessionId, reason: impl Into<String>) -> Self {
        ConnectionError::SendFailed {
            session_id,
            reason: reason.into(),
        }
    }

    /// The session the failure belongs to.
    pub fn session_id(&self) -> SessionId {
        match self {
            ConnectionError::Closed { session_id } => *session_id,
            ConnectionError::SendFailed { session_id, .. } => *session_id,
        }
    }
}

/// Session registry invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("session {0} is already registered")]
    DuplicateSession(SessionId),
}

/// Failure reported by a scheduled callback.
///
/// The scheduler logs and discards it; there is no retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scheduled job failed: {0}")]
pub struct JobError(pub String);

impl JobError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
