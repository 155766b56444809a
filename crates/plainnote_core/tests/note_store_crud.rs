use plainnote_core::{Note, NoteStore, SqliteNoteStore, StoreError};
use std::thread;
use std::time::Duration;

#[test]
fn insert_assigns_sequential_ids_and_preserves_fields() {
    let store = SqliteNoteStore::open_in_memory().unwrap();

    let id_a = store.insert(&Note::draft("A", "x")).unwrap();
    let id_b = store.insert(&Note::draft("B", "y")).unwrap();
    assert_eq!(id_a, 1);
    assert_eq!(id_b, 2);

    let all = store.all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!((all[0].id, all[0].title.as_str(), all[0].content.as_str()), (1, "A", "x"));
    assert_eq!((all[1].id, all[1].title.as_str(), all[1].content.as_str()), (2, "B", "y"));
    assert!(all.iter().all(|note| note.is_persisted()));
}

#[test]
fn insert_stamps_save_time() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    store.insert(&Note::draft("t", "c")).unwrap();

    let saved = store.all().unwrap()[0].clone();
    assert!(saved.timestamp > 0, "insert must stamp the save time");
}

#[test]
fn insert_ignores_caller_supplied_id() {
    let store = SqliteNoteStore::open_in_memory().unwrap();

    let mut rogue = Note::draft("rogue", "");
    rogue.id = 99;
    let id = store.insert(&rogue).unwrap();
    assert_eq!(id, 1, "store always assigns its own id");
}

#[test]
fn update_rewrites_fields_and_restamps_timestamp() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    let id = store.insert(&Note::draft("before", "old")).unwrap();
    let created = store.all().unwrap()[0].clone();

    // Millisecond timestamps need a beat between the two writes.
    thread::sleep(Duration::from_millis(15));

    let mut edited = created.clone();
    edited.title = "after".to_string();
    edited.content = "new".to_string();
    store.update(&edited).unwrap();

    let reread = store.all().unwrap()[0].clone();
    assert_eq!(reread.id, id);
    assert_eq!(reread.title, "after");
    assert_eq!(reread.content, "new");
    assert!(
        reread.timestamp > created.timestamp,
        "update must re-stamp the save time"
    );
}

#[test]
fn update_unknown_id_returns_not_found() {
    let store = SqliteNoteStore::open_in_memory().unwrap();

    let mut ghost = Note::draft("ghost", "");
    ghost.id = 12;
    let err = store.update(&ghost).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(12)));
}

#[test]
fn delete_is_idempotent() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    let id = store.insert(&Note::draft("gone", "")).unwrap();

    store.delete(id).unwrap();
    store.delete(id).unwrap();
    assert!(store.all().unwrap().is_empty());
}

#[test]
fn ordering_is_insertion_order_not_update_order() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    let first = store.insert(&Note::draft("first", "")).unwrap();
    store.insert(&Note::draft("second", "")).unwrap();

    let mut edited = store.all().unwrap()[0].clone();
    edited.content = "touched".to_string();
    store.update(&edited).unwrap();

    let all = store.all().unwrap();
    assert_eq!(all[0].id, first, "updates must not re-sort the collection");
    assert_eq!(all[0].content, "touched");
}

#[test]
fn insert_after_delete_never_reuses_ids() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    store.insert(&Note::draft("A", "x")).unwrap();
    store.insert(&Note::draft("B", "y")).unwrap();
    store.delete(1).unwrap();

    let all = store.all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!((all[0].id, all[0].title.as_str()), (2, "B"));

    let id = store.insert(&Note::draft("C", "z")).unwrap();
    assert_eq!(id, 3, "deleted ids are never reassigned");
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    {
        let store = SqliteNoteStore::open(&path).unwrap();
        store.insert(&Note::draft("durable", "bytes")).unwrap();
    }

    let store = SqliteNoteStore::open(&path).unwrap();
    let all = store.all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "durable");
}
