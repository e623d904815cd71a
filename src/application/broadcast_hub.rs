//! BroadcastHub - Fan-out of inbound messages with a delayed rebroadcast.
//!
//! Flow for one inbound message:
//! 1. `"stop"` closes the sender and ends there
//! 2. Assign the next sequence id
//! 3. Send to every session in the registry snapshot, sender included
//! 4. Schedule the `" (delayed)"` copy; its recipients are read from the
//!    registry when the job fires, not now
//!
//! A failed send only affects that session. Closing a session does not
//! cancel rebroadcasts it already triggered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::domain::broadcast::{BroadcastMessage, JobError, PendingRebroadcast, RegistryError};
use crate::domain::foundation::{SequenceId, SessionId};
use crate::ports::{DelayScheduler, ScheduleHandle, Session, SessionRegistry};

/// Default pause before the rebroadcast.
pub const DEFAULT_REBROADCAST_DELAY: Duration = Duration::from_millis(500);

/// Default control token that closes the sender's connection.
pub const DEFAULT_STOP_COMMAND: &str = "stop";

/// Default suffix appended to the rebroadcast copy.
pub const DEFAULT_DELAYED_SUFFIX: &str = " (delayed)";

/// Tunables for the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSettings {
    pub rebroadcast_delay: Duration,
    pub stop_command: String,
    pub delayed_suffix: String,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            rebroadcast_delay: DEFAULT_REBROADCAST_DELAY,
            stop_command: DEFAULT_STOP_COMMAND.to_string(),
            delayed_suffix: DEFAULT_DELAYED_SUFFIX.to_string(),
        }
    }
}

/// Outcome of one broadcast round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sequence_id: SequenceId,

    /// Sessions the frame was handed to successfully.
    pub delivered: usize,

    /// Sessions skipped because their send failed.
    pub failed: Vec<SessionId>,
}

impl BroadcastReport {
    fn new(sequence_id: SequenceId) -> Self {
        Self {
            sequence_id,
            delivered: 0,
            failed: Vec::new(),
        }
    }

    /// Size of the snapshot the round was addressed to.
    pub fn recipients(&self) -> usize {
        self.delivered + self.failed.len()
    }
}

/// What `on_message` did with an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The stop token was received and the sender was closed.
    Stopped,

    /// The message was broadcast and a rebroadcast is scheduled.
    Broadcast {
        report: BroadcastReport,
        rebroadcast: ScheduleHandle,
    },
}

/// Shared broadcast service for all connections.
///
/// One instance serves every session; per-connection state lives in the
/// registry, the sequence counter lives here.
pub struct BroadcastHub {
    registry: Arc<dyn SessionRegistry>,
    scheduler: Arc<dyn DelayScheduler>,
    settings: HubSettings,
    next_sequence: AtomicU64,
}

impl BroadcastHub {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        scheduler: Arc<dyn DelayScheduler>,
        settings: HubSettings,
    ) -> Self {
        Self {
            registry,
            scheduler,
            settings,
            next_sequence: AtomicU64::new(0),
        }
    }

    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }

    /// Register a newly connected session.
    pub async fn on_open(&self, session: Arc<dyn Session>) -> Result<(), RegistryError> {
        let session_id = session.id();
        self.registry.register(session).await?;
        tracing::info!(session_id = %session_id, "Session opened");
        Ok(())
    }

    /// Forget a session. Already scheduled rebroadcasts still fire.
    pub async fn on_close(&self, session_id: &SessionId, reason: &str) {
        self.registry.unregister(session_id).await;
        tracing::info!(session_id = %session_id, reason = reason, "Session closed");
    }

    /// Log a transport error. The connection is torn down by its owner.
    pub fn on_error(&self, session_id: &SessionId, error: &dyn std::error::Error) {
        tracing::warn!(session_id = %session_id, error = %error, "Session error");
    }

    /// Handle one inbound text frame from `session`.
    ///
    /// Callers must not overlap calls for the same session.
    pub async fn on_message(&self, session: &dyn Session, text: &str) -> MessageOutcome {
        let session_id = session.id();

        if text == self.settings.stop_command {
            tracing::info!(session_id = %session_id, "Session asked to stop");
            if let Err(e) = session.close().await {
                tracing::debug!(session_id = %session_id, error = %e, "Close after stop failed");
            }
            return MessageOutcome::Stopped;
        }

        let sequence_id = SequenceId::new(self.next_sequence.fetch_add(1, Ordering::SeqCst));
        let message = BroadcastMessage::new(session_id, sequence_id, text);

        let report = deliver(self.registry.as_ref(), &message).await;
        tracing::debug!(
            session_id = %session_id,
            sequence_id = %sequence_id,
            delivered = report.delivered,
            failed = report.failed.len(),
            "Message broadcast"
        );

        let rebroadcast = self.schedule_rebroadcast(&message);

        MessageOutcome::Broadcast {
            report,
            rebroadcast,
        }
    }

    /// Cancel a rebroadcast that has not fired yet. Silent otherwise.
    pub fn cancel_rebroadcast(&self, handle: &ScheduleHandle) {
        self.scheduler.cancel(handle);
    }

    pub fn pending_rebroadcasts(&self) -> Vec<PendingRebroadcast> {
        self.scheduler.pending()
    }

    pub async fn session_count(&self) -> usize {
        self.registry.len().await
    }

    fn schedule_rebroadcast(&self, message: &BroadcastMessage) -> ScheduleHandle {
        let delayed = message.delayed(&self.settings.delayed_suffix);
        let registry = Arc::clone(&self.registry);

        let callback = async move {
            // Recipients are whoever is registered now.
            let report = deliver(registry.as_ref(), &delayed).await;
            tracing::debug!(
                sequence_id = %report.sequence_id,
                delivered = report.delivered,
                failed = report.failed.len(),
                "Delayed rebroadcast sent"
            );
            Ok::<(), JobError>(())
        }
        .boxed();

        self.scheduler.schedule(
            PendingRebroadcast::for_message(message),
            self.settings.rebroadcast_delay,
            callback,
        )
    }
}

/// Send `message` to every session in the current registry snapshot.
async fn deliver(registry: &dyn SessionRegistry, message: &BroadcastMessage) -> BroadcastReport {
    let mut report = BroadcastReport::new(message.sequence_id());

    for session in registry.snapshot().await {
        if !session.is_open() {
            report.failed.push(session.id());
            continue;
        }

        match session.send(message.text()).await {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                tracing::debug!(
                    session_id = %session.id(),
                    sequence_id = %message.sequence_id(),
                    error = %e,
                    "Send failed, skipping session"
                );
                report.failed.push(session.id());
            }
        }
    }

    report
}
