//! DelayScheduler port - Run a callback once after a delay.
//!
//! Scheduling returns immediately; the wait and the callback both happen on
//! the scheduler's own tasks, never nested inside the caller.
//!
//! ## Failure Semantics
//!
//! A callback that returns `Err(JobError)` (or panics) is logged and dropped.
//! It never affects other pending jobs or the scheduler itself.
//!
//! ## Cancellation
//!
//! `cancel` is best-effort. Cancelling a job that already fired, or was
//! already cancelled, silently does nothing.

use std::fmt;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::domain::broadcast::{JobError, PendingRebroadcast};

/// Deferred work handed to the scheduler.
pub type DelayedCallback = BoxFuture<'static, Result<(), JobError>>;

/// Opaque handle identifying one scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

impl ScheduleHandle {
    /// Create a handle from a raw job number.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScheduleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Port for delayed, cancellable, run-once jobs.
pub trait DelayScheduler: Send + Sync {
    /// Arrange for `callback` to run exactly once after `delay`.
    ///
    /// `pending` tags the job while it waits and is visible through
    /// [`DelayScheduler::pending`].
    fn schedule(
        &self,
        pending: PendingRebroadcast,
        delay: Duration,
        callback: DelayedCallback,
    ) -> ScheduleHandle;

    /// Cancel a job if it has not fired yet.
    fn cancel(&self, handle: &ScheduleHandle);

    /// Jobs that are scheduled but have not fired or been cancelled.
    fn pending(&self) -> Vec<PendingRebroadcast>;

    /// Cancel every pending job. Returns how many were cancelled.
    ///
    /// Used on graceful shutdown.
    fn cancel_all(&self) -> usize;
}
