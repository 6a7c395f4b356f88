#![forbid(unsafe_code)]

use cg_storage::SqliteStore;

fn setup() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::open(dir.path().join("context.db")).expect("open store");
    (dir, store)
}

#[test]
fn get_learning_round_trips() {
    let (_dir, mut store) = setup();
    let conv = store.conversation_resolve(Some("S1")).unwrap();
    let id = store
        .learning_append(&conv.id, "technical", "Code sample", "const answer = 42;")
        .unwrap();
    let fetched = store.learning_get(&id).unwrap().unwrap();
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.content, "const answer = 42;");
}

#[test]
fn search_matches_title_or_content_case_sensitively() {
    let (_dir, mut store) = setup();
    let conv = store.conversation_resolve(Some("S1")).unwrap();
    store
        .learning_append(&conv.id, "technical", "Code sample", "const answer = 42;")
        .unwrap();

    let hits = store.learning_search("answer", None).unwrap();
    assert_eq!(hits.len(), 1);

    let no_hits = store.learning_search("ANSWER", None).unwrap();
    assert!(no_hits.is_empty());
}

#[test]
fn search_orders_newest_first_and_clamps_limit() {
    let (_dir, mut store) = setup();
    let conv = store.conversation_resolve(Some("S1")).unwrap();
    for i in 0..3 {
        store
            .learning_append(&conv.id, "technical", &format!("title {i}"), "shared token")
            .unwrap();
    }
    let hits = store.learning_search("shared", Some(0)).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "title 2");

    let hits_over = store.learning_search("shared", Some(1000)).unwrap();
    assert_eq!(hits_over.len(), 3);
}

#[test]
fn extractor_does_not_dedupe() {
    let (_dir, mut store) = setup();
    let conv = store.conversation_resolve(Some("S1")).unwrap();
    store
        .learning_append(&conv.id, "technical", "same", "same body")
        .unwrap();
    store
        .learning_append(&conv.id, "technical", "same", "same body")
        .unwrap();
    let hits = store.learning_search("same body", Some(50)).unwrap();
    assert_eq!(hits.len(), 2);
}
