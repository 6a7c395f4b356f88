#![forbid(unsafe_code)]

//! Drain loop shared by both job types. Generalizes `bm_runner`'s
//! poll-claim-execute-heartbeat loop (`crates/runner/src/main.rs`) down to
//! this system's simpler, revision-less job queue: no lease renewal, no
//! heartbeats, cooperative backoff owned entirely by the worker
//! (spec.md §4.5 "Retry policy").

use cg_core::model::JobType;
use cg_storage::{JobRow, SqliteStore, StoreError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::Duration;

pub(crate) struct BackoffConfig {
    pub(crate) base_ms: u64,
    pub(crate) max_ms: u64,
}

impl BackoffConfig {
    /// `min(max_backoff, base * 2^attempts)` per spec.md §4.5.
    pub(crate) fn delay_for(&self, attempts: i64) -> Duration {
        let exp = attempts.clamp(0, 32) as u32;
        let scaled = self.base_ms.saturating_mul(1u64.checked_shl(exp).unwrap_or(u64::MAX));
        Duration::from_millis(scaled.min(self.max_ms))
    }
}

pub(crate) struct WorkerConfig {
    pub(crate) job_type: JobType,
    pub(crate) idle_poll: Duration,
    pub(crate) backoff: BackoffConfig,
}

pub(crate) trait JobHandler {
    /// Processes one claimed job's payload, returning an error message on
    /// failure. Never panics; all fallible work is funneled through `Result`.
    fn handle(&self, store: &mut SqliteStore, job: &JobRow) -> Result<(), String>;
}

fn install_shutdown_flag() -> Arc<AtomicBool> {
    let stopping = Arc::new(AtomicBool::new(false));
    let flag = stopping.clone();
    // ctrlc registers both SIGINT and, with the "termination" feature, SIGTERM on unix.
    if let Err(err) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!(error = %err, "failed to install shutdown signal handler");
    }
    stopping
}

/// Runs until `claim` is cancelled between jobs (spec.md §4.9
/// "Cancellation") or the process receives SIGINT/SIGTERM.
pub(crate) fn run(
    mut store: SqliteStore,
    config: WorkerConfig,
    handler: &dyn JobHandler,
) -> Result<(), StoreError> {
    let stopping = install_shutdown_flag();

    while !stopping.load(Ordering::SeqCst) {
        let claimed = store.job_claim(config.job_type)?;
        let Some(job) = claimed else {
            sleep(config.idle_poll);
            continue;
        };

        tracing::info!(job_id = %job.id, job_type = config.job_type.as_str(), "claimed job");

        match handler.handle(&mut store, &job) {
            Ok(()) => {
                store.job_complete(&job.id)?;
                tracing::info!(job_id = %job.id, "job completed");
            }
            Err(message) => {
                let outcome = store.job_fail(&job.id, &message)?;
                tracing::warn!(job_id = %job.id, error = %message, status = outcome.status.as_str(), "job failed");
                if !outcome.status.is_terminal() {
                    sleep(config.backoff.delay_for(outcome.attempts));
                }
            }
        }
    }

    tracing::info!("shutdown signal received, exiting between jobs");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_clamps_to_max() {
        let backoff = BackoffConfig { base_ms: 200, max_ms: 30_000 };
        assert_eq!(backoff.delay_for(0), Duration::from_millis(200));
        assert_eq!(backoff.delay_for(1), Duration::from_millis(400));
        assert_eq!(backoff.delay_for(2), Duration::from_millis(800));
        assert_eq!(backoff.delay_for(20), Duration::from_millis(30_000));
    }
}
