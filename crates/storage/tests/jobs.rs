#![forbid(unsafe_code)]

use cg_core::model::{JobStatus, JobType};
use cg_storage::SqliteStore;
use serde_json::json;

fn setup() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::open(dir.path().join("context.db")).expect("open store");
    (dir, store)
}

#[test]
fn claim_transitions_queued_to_in_progress_and_increments_attempts() {
    let (_dir, mut store) = setup();
    let id = store
        .job_enqueue(JobType::SanitizeAsync, &json!({"messageId": "m1"}))
        .unwrap();
    let claimed = store.job_claim(JobType::SanitizeAsync).unwrap().unwrap();
    assert_eq!(claimed.id, id);
    assert_eq!(claimed.status, JobStatus::InProgress);
    assert_eq!(claimed.attempts, 1);
}

#[test]
fn claim_returns_none_when_nothing_queued() {
    let (_dir, mut store) = setup();
    assert!(store.job_claim(JobType::SanitizeAsync).unwrap().is_none());
}

#[test]
fn claim_only_returns_one_job_when_two_are_queued_and_only_one_requested() {
    let (_dir, mut store) = setup();
    store
        .job_enqueue(JobType::SanitizeAsync, &json!({"messageId": "m1"}))
        .unwrap();
    store
        .job_enqueue(JobType::SanitizeAsync, &json!({"messageId": "m2"}))
        .unwrap();
    let first = store.job_claim(JobType::SanitizeAsync).unwrap().unwrap();
    let second = store.job_claim(JobType::SanitizeAsync).unwrap().unwrap();
    assert_ne!(first.id, second.id);
    assert!(store.job_claim(JobType::SanitizeAsync).unwrap().is_none());
}

#[test]
fn claim_does_not_cross_job_types() {
    let (_dir, mut store) = setup();
    store
        .job_enqueue(JobType::ExtractLearningAi, &json!({"conversationId": "c1"}))
        .unwrap();
    assert!(store.job_claim(JobType::SanitizeAsync).unwrap().is_none());
}

#[test]
fn complete_is_terminal() {
    let (_dir, mut store) = setup();
    let id = store
        .job_enqueue(JobType::SanitizeAsync, &json!({"messageId": "m1"}))
        .unwrap();
    store.job_claim(JobType::SanitizeAsync).unwrap();
    store.job_complete(&id).unwrap();
    let row = store.job_get(&id).unwrap().unwrap();
    assert_eq!(row.status, JobStatus::Completed);
    assert!(store.job_complete(&id).is_err());
}

#[test]
fn fail_requeues_until_max_attempts_then_dead_letters() {
    let (_dir, mut store) = setup();
    let id = store
        .job_enqueue(JobType::SanitizeAsync, &json!({"messageId": "m1"}))
        .unwrap();

    for attempt in 1..=3 {
        store.job_claim(JobType::SanitizeAsync).unwrap().unwrap();
        let row = store.job_fail(&id, &format!("boom {attempt}")).unwrap();
        if attempt < 3 {
            assert_eq!(row.status, JobStatus::Queued);
        } else {
            assert_eq!(row.status, JobStatus::DeadLetter);
        }
    }

    let row = store.job_get(&id).unwrap().unwrap();
    assert_eq!(row.status, JobStatus::DeadLetter);
    assert_eq!(row.attempts, 3);
    assert_eq!(row.error.as_deref(), Some("boom 3"));
    assert!(store.job_claim(JobType::SanitizeAsync).unwrap().is_none());
}

#[test]
fn dead_letter_is_absorbing() {
    let (_dir, mut store) = setup();
    let id = store
        .job_enqueue(JobType::SanitizeAsync, &json!({"messageId": "m1"}))
        .unwrap();
    for _ in 0..3 {
        store.job_claim(JobType::SanitizeAsync).unwrap();
        store.job_fail(&id, "boom").unwrap();
    }
    assert!(store.job_fail(&id, "again").is_err());
}
