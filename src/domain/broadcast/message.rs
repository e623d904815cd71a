//! Broadcast message value objects.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SequenceId, SessionId, Timestamp};

/// One accepted inbound message, as fanned out to every registered session.
///
/// Immutable once built. The delayed rebroadcast is a separate value produced
/// by [`BroadcastMessage::delayed`], sharing the sequence id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    sender_id: SessionId,
    sequence_id: SequenceId,
    text: String,
}

impl BroadcastMessage {
    /// Creates a new message.
    pub fn new(sender_id: SessionId, sequence_id: SequenceId, text: impl Into<String>) -> Self {
        Self {
            sender_id,
            sequence_id,
            text: text.into(),
        }
    }

    /// Builds the rebroadcast copy: same sender and sequence id, `suffix` appended.
    pub fn delayed(&self, suffix: &str) -> Self {
        Self {
            sender_id: self.sender_id,
            sequence_id: self.sequence_id,
            text: format!("{}{}", self.text, suffix),
        }
    }

    pub fn sender_id(&self) -> SessionId {
        self.sender_id
    }

    pub fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    /// The literal payload written to each outbound frame.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A rebroadcast waiting on the scheduler.
///
/// Lives between scheduling and firing (or cancellation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRebroadcast {
    pub sequence_id: SequenceId,
    pub sender_id: SessionId,
    pub scheduled_at: Timestamp,
}

impl PendingRebroadcast {
    /// Tags a rebroadcast of `message`, stamped with the current time.
    pub fn for_message(message: &BroadcastMessage) -> Self {
        Self {
            sequence_id: message.sequence_id(),
            sender_id: message.sender_id(),
            scheduled_at: Timestamp::now(),
        }
    }
}
