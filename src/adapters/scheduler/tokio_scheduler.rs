//! Tokio-backed delay scheduler.
//!
//! Each scheduled job gets its own task: sleep for the delay, claim the job
//! from the pending table, then run the callback. Claiming before running is
//! what makes a job fire at most once when `cancel` races the timer: whoever
//! removes the entry first wins.
//!
//! ## Failure Isolation
//!
//! Callbacks run under `catch_unwind`. An `Err` is logged at `warn`, a panic
//! at `error`; neither touches other jobs.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tokio::task::AbortHandle;

use crate::domain::broadcast::PendingRebroadcast;
use crate::ports::{DelayScheduler, DelayedCallback, ScheduleHandle};

struct PendingJob {
    pending: PendingRebroadcast,
    abort: AbortHandle,
}

type JobTable = Mutex<HashMap<ScheduleHandle, PendingJob>>;

fn lock(jobs: &JobTable) -> MutexGuard<'_, HashMap<ScheduleHandle, PendingJob>> {
    // The table holds plain data; a panic elsewhere cannot leave it half-updated.
    jobs.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Delay scheduler running jobs on the ambient tokio runtime.
///
/// # Panics
///
/// `schedule` must be called from within a tokio runtime.
pub struct TokioDelayScheduler {
    jobs: Arc<JobTable>,
    next_id: AtomicU64,
}

impl TokioDelayScheduler {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl Default for TokioDelayScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayScheduler for TokioDelayScheduler {
    fn schedule(
        &self,
        pending: PendingRebroadcast,
        delay: Duration,
        callback: DelayedCallback,
    ) -> ScheduleHandle {
        let handle = ScheduleHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let sequence_id = pending.sequence_id;
        let jobs = Arc::clone(&self.jobs);

        // Insert under the same guard as the spawn so the task can never
        // look for its entry before it exists.
        let mut table = lock(&self.jobs);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let claimed = lock(&jobs).remove(&handle).is_some();
            if !claimed {
                return;
            }

            match AssertUnwindSafe(callback).catch_unwind().await {
                Ok(Ok(())) => {
                    tracing::trace!(job = %handle, sequence_id = %sequence_id, "Scheduled job completed");
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        job = %handle,
                        sequence_id = %sequence_id,
                        error = %e,
                        "Scheduled job failed, discarding"
                    );
                }
                Err(_) => {
                    tracing::error!(
                        job = %handle,
                        sequence_id = %sequence_id,
                        "Scheduled job panicked, discarding"
                    );
                }
            }
        });
        table.insert(
            handle,
            PendingJob {
                pending,
                abort: task.abort_handle(),
            },
        );

        tracing::trace!(job = %handle, sequence_id = %sequence_id, delay_ms = delay.as_millis() as u64, "Job scheduled");
        handle
    }

    fn cancel(&self, handle: &ScheduleHandle) {
        match lock(&self.jobs).remove(handle) {
            Some(job) => {
                job.abort.abort();
                tracing::debug!(job = %handle, sequence_id = %job.pending.sequence_id, "Job cancelled");
            }
            None => {
                tracing::trace!(job = %handle, "Cancel ignored, job already fired or cancelled");
            }
        }
    }

    fn pending(&self) -> Vec<PendingRebroadcast> {
        let mut pending: Vec<PendingRebroadcast> = lock(&self.jobs)
            .values()
            .map(|job| job.pending.clone())
            .collect();
        pending.sort_by_key(|p| p.sequence_id);
        pending
    }

    fn cancel_all(&self) -> usize {
        let drained: Vec<PendingJob> = lock(&self.jobs).drain().map(|(_, job)| job).collect();
        for job in &drained {
            job.abort.abort();
        }
        if !drained.is_empty() {
            tracing::info!(cancelled = drained.len(), "Cancelled pending jobs");
        }
        drained.len()
    }
}
