use plainnote_core::{Note, UNSAVED_NOTE_ID};

#[test]
fn draft_uses_unsaved_sentinel() {
    let note = Note::draft("title", "content");
    assert_eq!(note.id, UNSAVED_NOTE_ID);
    assert!(!note.is_persisted());
}

#[test]
fn serde_roundtrip_preserves_fields() {
    let note = Note {
        id: 42,
        title: "meeting".to_string(),
        content: "agenda".to_string(),
        timestamp: 1_700_000_000_000,
    };

    let json = serde_json::to_string(&note).unwrap();
    let back: Note = serde_json::from_str(&json).unwrap();
    assert_eq!(back, note);
}

#[test]
fn missing_fields_are_rejected() {
    let err = serde_json::from_str::<Note>(r#"{"id": 1, "title": "x"}"#);
    assert!(err.is_err());
}
