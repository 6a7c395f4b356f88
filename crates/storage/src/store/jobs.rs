#![forbid(unsafe_code)]

use super::{JobRow, SqliteStore, StoreError, now_rfc3339};
use cg_core::ids::JobId;
use cg_core::model::{JobStatus, JobType};
use rusqlite::{OptionalExtension, TransactionBehavior, params};

const DEFAULT_MAX_ATTEMPTS: i64 = 3;

fn read_job_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<JobRow> {
    let id: String = row.get(0)?;
    let job_type: String = row.get(1)?;
    let status: String = row.get(3)?;
    Ok(JobRow {
        id: JobId::try_new(id).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "id".into(), rusqlite::types::Type::Text)
        })?,
        job_type: JobType::from_str(&job_type).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(1, "type".into(), rusqlite::types::Type::Text)
        })?,
        payload: row.get(2)?,
        status: JobStatus::from_str(&status).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(3, "status".into(), rusqlite::types::Type::Text)
        })?,
        attempts: row.get(4)?,
        max_attempts: row.get(5)?,
        error: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const JOB_COLUMNS: &str =
    "id, type, payload, status, attempts, max_attempts, error, created_at, updated_at";

impl SqliteStore {
    /// Inserts a `queued` job with `attempts=0`, `max_attempts=3`
    /// (spec.md §4.5 `enqueue`). `payload` carries only identifiers, never
    /// message/conversation content (spec.md §9 "State to avoid carrying").
    pub fn job_enqueue(
        &mut self,
        job_type: JobType,
        payload: &serde_json::Value,
    ) -> Result<JobId, StoreError> {
        let id = JobId::generate();
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO job_queue(id, type, payload, status, attempts, max_attempts, error, created_at, updated_at)
             VALUES (?1, ?2, ?3, 'queued', 0, ?4, NULL, ?5, ?5)",
            params![
                id.as_str(),
                job_type.as_str(),
                payload.to_string(),
                DEFAULT_MAX_ATTEMPTS,
                now,
            ],
        )?;
        Ok(id)
    }

    /// Atomically selects the oldest `queued` job of `job_type`,
    /// transitions it to `in_progress`, increments `attempts`, and returns
    /// it — or `None` if no job is available (spec.md §4.5 `claim`).
    ///
    /// The whole operation runs inside an `IMMEDIATE` transaction so the
    /// candidate-select and the conditional update can never interleave
    /// with another process's claim on the same row: SQLite's write lock
    /// is taken up front, and the second-place worker either sees the row
    /// already `in_progress` (the `WHERE status = 'queued'` guard fails,
    /// `changed == 0`) or blocks on `busy_timeout` until the first
    /// transaction commits and then observes the same thing.
    pub fn job_claim(&mut self, job_type: JobType) -> Result<Option<JobRow>, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let candidate_id: Option<String> = tx
            .query_row(
                "SELECT id FROM job_queue WHERE status = 'queued' AND type = ?1
                 ORDER BY created_at ASC, id ASC LIMIT 1",
                params![job_type.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(candidate_id) = candidate_id else {
            tx.commit()?;
            return Ok(None);
        };

        let now = now_rfc3339();
        let changed = tx.execute(
            "UPDATE job_queue SET status = 'in_progress', attempts = attempts + 1, updated_at = ?2
             WHERE id = ?1 AND status = 'queued'",
            params![candidate_id, now],
        )?;
        if changed != 1 {
            // Lost a race to another claimant between the select and the
            // update; the caller should simply try again.
            tx.commit()?;
            return Ok(None);
        }

        let job = tx.query_row(
            &format!("SELECT {JOB_COLUMNS} FROM job_queue WHERE id = ?1"),
            params![candidate_id],
            read_job_row,
        )?;
        tx.commit()?;
        Ok(Some(job))
    }

    /// Transitions a claimed job to `completed` (spec.md §4.5 `complete`).
    pub fn job_complete(&mut self, job_id: &JobId) -> Result<(), StoreError> {
        let now = now_rfc3339();
        let changed = self.conn.execute(
            "UPDATE job_queue SET status = 'completed', updated_at = ?2
             WHERE id = ?1 AND status = 'in_progress'",
            params![job_id.as_str(), now],
        )?;
        if changed != 1 {
            return Err(StoreError::JobNotClaimable {
                job_id: job_id.as_str().to_string(),
                status: "in_progress".to_string(),
            });
        }
        Ok(())
    }

    /// Re-queues a job for retry, or dead-letters it once `attempts` has
    /// reached `max_attempts` (spec.md §4.5 `fail`). Returns the row after
    /// the transition so the worker can read `attempts`/`status` to decide
    /// its backoff sleep.
    pub fn job_fail(&mut self, job_id: &JobId, error_message: &str) -> Result<JobRow, StoreError> {
        let tx = self.conn.transaction()?;
        let now = now_rfc3339();

        let (attempts, max_attempts, status): (i64, i64, String) = tx
            .query_row(
                "SELECT attempts, max_attempts, status FROM job_queue WHERE id = ?1",
                params![job_id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?
            .ok_or(StoreError::UnknownId)?;

        if JobStatus::from_str(&status).is_some_and(JobStatus::is_terminal) {
            return Err(StoreError::JobAlreadyTerminal {
                job_id: job_id.as_str().to_string(),
                status,
            });
        }

        let next_status = if attempts < max_attempts {
            "queued"
        } else {
            "dead_letter"
        };

        tx.execute(
            "UPDATE job_queue SET status = ?2, error = ?3, updated_at = ?4 WHERE id = ?1",
            params![job_id.as_str(), next_status, error_message, now],
        )?;

        let job = tx.query_row(
            &format!("SELECT {JOB_COLUMNS} FROM job_queue WHERE id = ?1"),
            params![job_id.as_str()],
            read_job_row,
        )?;
        tx.commit()?;
        Ok(job)
    }

    pub fn job_get(&self, job_id: &JobId) -> Result<Option<JobRow>, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {JOB_COLUMNS} FROM job_queue WHERE id = ?1"),
                params![job_id.as_str()],
                read_job_row,
            )
            .optional()
            .map_err(StoreError::from)
    }
}
