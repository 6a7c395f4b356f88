#![forbid(unsafe_code)]

use cg_storage::SqliteStore;

fn setup() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::open(dir.path().join("context.db")).expect("open store");
    (dir, store)
}

#[test]
fn same_session_reuses_conversation() {
    let (_dir, mut store) = setup();
    let a = store.conversation_resolve(Some("S1")).unwrap();
    let b = store.conversation_resolve(Some("S1")).unwrap();
    assert_eq!(a.id, b.id);
}

#[test]
fn missing_session_creates_new_conversation_each_time() {
    let (_dir, mut store) = setup();
    let a = store.conversation_resolve(None).unwrap();
    let b = store.conversation_resolve(None).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn distinct_sessions_get_distinct_conversations() {
    let (_dir, mut store) = setup();
    let a = store.conversation_resolve(Some("S1")).unwrap();
    let b = store.conversation_resolve(Some("S2")).unwrap();
    assert_ne!(a.id, b.id);
}
