#![forbid(unsafe_code)]

use cg_core::model::Role;
use cg_storage::SqliteStore;

fn setup() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::open(dir.path().join("context.db")).expect("open store");
    (dir, store)
}

#[test]
fn appended_rows_are_readable_and_never_mutated_by_the_api() {
    let (_dir, mut store) = setup();
    let conv = store.conversation_resolve(Some("S1")).unwrap();
    let msg = store.message_insert(&conv.id, Role::User, "hi").unwrap();

    store
        .sanitization_log_append(&msg.id, &["EMAIL survivor".to_string()])
        .unwrap();
    let rows = store.sanitization_log_for_message(&msg.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].issues, vec!["EMAIL survivor".to_string()]);
}
