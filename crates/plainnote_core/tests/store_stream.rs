use plainnote_core::{Note, NoteStore, NotesSnapshot, SqliteNoteStore};
use std::time::Duration;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_TIMEOUT: Duration = Duration::from_millis(100);

#[test]
fn subscribe_delivers_current_collection_immediately() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    store.insert(&Note::draft("pre-existing", "")).unwrap();

    let watch = store.subscribe().unwrap();
    let snapshot: NotesSnapshot = watch.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title, "pre-existing");
}

#[test]
fn each_mutation_emits_exactly_one_snapshot() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    let watch = store.subscribe().unwrap();
    assert!(watch.recv_timeout(RECV_TIMEOUT).unwrap().is_empty());

    let id = store.insert(&Note::draft("A", "x")).unwrap();
    let after_insert = watch.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(after_insert.len(), 1);
    assert!(
        watch.recv_timeout(QUIET_TIMEOUT).is_err(),
        "one mutation must yield one emission"
    );

    let mut edited = after_insert[0].clone();
    edited.content = "y".to_string();
    store.update(&edited).unwrap();
    assert_eq!(watch.recv_timeout(RECV_TIMEOUT).unwrap()[0].content, "y");

    store.delete(id).unwrap();
    assert!(watch.recv_timeout(RECV_TIMEOUT).unwrap().is_empty());
    assert!(watch.recv_timeout(QUIET_TIMEOUT).is_err());
}

#[test]
fn noop_delete_emits_nothing() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    let watch = store.subscribe().unwrap();
    let _ = watch.recv_timeout(RECV_TIMEOUT).unwrap();

    store.delete(404).unwrap();
    assert!(
        watch.recv_timeout(QUIET_TIMEOUT).is_err(),
        "idempotent delete of an absent id must not emit"
    );
}

#[test]
fn subscribers_are_independent() {
    let store = SqliteNoteStore::open_in_memory().unwrap();

    let early = store.subscribe().unwrap();
    assert!(early.recv_timeout(RECV_TIMEOUT).unwrap().is_empty());

    store.insert(&Note::draft("A", "")).unwrap();
    assert_eq!(early.recv_timeout(RECV_TIMEOUT).unwrap().len(), 1);

    // A late subscriber starts from the current state, not from history.
    let late = store.subscribe().unwrap();
    let seen = late.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(seen.len(), 1);

    store.insert(&Note::draft("B", "")).unwrap();
    assert_eq!(early.recv_timeout(RECV_TIMEOUT).unwrap().len(), 2);
    assert_eq!(late.recv_timeout(RECV_TIMEOUT).unwrap().len(), 2);
}

#[test]
fn dropped_subscriber_does_not_break_mutations() {
    let store = SqliteNoteStore::open_in_memory().unwrap();

    let watch = store.subscribe().unwrap();
    drop(watch);

    store.insert(&Note::draft("still fine", "")).unwrap();
    assert_eq!(store.all().unwrap().len(), 1);
}

#[test]
fn stream_is_restartable() {
    let store = SqliteNoteStore::open_in_memory().unwrap();

    drop(store.subscribe().unwrap());
    store.insert(&Note::draft("A", "")).unwrap();

    let watch = store.subscribe().unwrap();
    assert_eq!(watch.recv_timeout(RECV_TIMEOUT).unwrap().len(), 1);
}
