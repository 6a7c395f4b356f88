#![forbid(unsafe_code)]

use crate::handlers::{ExtractHandler, SanitizeHandler};
use crate::runtime::JobHandler;
use cg_core::model::{JobType, Role};
use cg_pipeline::{HeuristicExtractor, LocalHeuristicValidator};
use cg_storage::SqliteStore;
use serde_json::json;

fn open_tmp() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("context.db")).unwrap();
    (dir, store)
}

#[test]
fn sanitize_handler_logs_residual_pii_and_leaves_clean_messages_alone() {
    let (_dir, mut store) = open_tmp();
    let conv = store.conversation_resolve(Some("S1")).unwrap();
    let dirty = store
        .message_insert(&conv.id, Role::User, "reach me at leaked@example.com")
        .unwrap();
    let clean = store
        .message_insert(&conv.id, Role::User, "nothing sensitive here")
        .unwrap();

    let handler = SanitizeHandler {
        validator: Box::new(LocalHeuristicValidator),
    };

    let dirty_job_id = store
        .job_enqueue(JobType::SanitizeAsync, &json!({"messageId": dirty.id.as_str()}))
        .unwrap();
    let dirty_job = store.job_claim(JobType::SanitizeAsync).unwrap().unwrap();
    handler.handle(&mut store, &dirty_job).unwrap();
    assert_eq!(
        store.sanitization_log_for_message(&dirty.id).unwrap().len(),
        1
    );

    let clean_job_id = store
        .job_enqueue(JobType::SanitizeAsync, &json!({"messageId": clean.id.as_str()}))
        .unwrap();
    let clean_job = store.job_claim(JobType::SanitizeAsync).unwrap().unwrap();
    handler.handle(&mut store, &clean_job).unwrap();
    assert!(
        store.sanitization_log_for_message(&clean.id).unwrap().is_empty()
    );

    assert_ne!(dirty_job_id, clean_job_id);
}

#[test]
fn extract_handler_appends_a_learning_from_a_fenced_code_block() {
    let (_dir, mut store) = open_tmp();
    let conv = store.conversation_resolve(Some("S1")).unwrap();
    store
        .message_insert(&conv.id, Role::User, "how do I answer 42")
        .unwrap();
    store
        .message_insert(
            &conv.id,
            Role::Assistant,
            "```js\nconst answer = 42;\n```",
        )
        .unwrap();

    let handler = ExtractHandler {
        extractor: Box::new(HeuristicExtractor),
    };
    store
        .job_enqueue(
            JobType::ExtractLearningAi,
            &json!({"conversationId": conv.id.as_str()}),
        )
        .unwrap();
    let job = store
        .job_claim(JobType::ExtractLearningAi)
        .unwrap()
        .unwrap();
    handler.handle(&mut store, &job).unwrap();

    let hits = store.learning_search("answer", None).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].content.contains("const answer = 42;"));
}

#[test]
fn sanitize_handler_fails_the_job_when_the_message_is_missing() {
    let (_dir, mut store) = open_tmp();
    store
        .job_enqueue(
            JobType::SanitizeAsync,
            &json!({"messageId": "01ARZ3NDEKTSV4RRFFQ69G5FAV"}),
        )
        .unwrap();
    let job = store.job_claim(JobType::SanitizeAsync).unwrap().unwrap();

    let handler = SanitizeHandler {
        validator: Box::new(LocalHeuristicValidator),
    };
    assert!(handler.handle(&mut store, &job).is_err());
}
