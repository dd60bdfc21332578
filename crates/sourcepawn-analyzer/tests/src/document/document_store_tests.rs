use tower_lsp::lsp_types::{Position, Range};

use super::*;

fn uri() -> Url {
    Url::parse("file:///plugin.sp").unwrap()
}

#[test]
fn store_open_get_content_close() {
    let store = DocumentStore::new();
    store.open(uri(), "public void OnPluginStart() {}".to_string(), 1);

    assert_eq!(store.get_content(&uri()), Some("public void OnPluginStart() {}".to_string()));
    assert_eq!(store.all_uris(), vec![uri()]);

    store.close(&uri());
    assert!(store.get_content(&uri()).is_none());
}

#[test]
fn store_update_existing_and_unknown() {
    let store = DocumentStore::new();
    store.update(uri(), "v1".to_string(), 1);
    store.update(uri(), "v2".to_string(), 2);
    let doc = store.get(&uri()).unwrap();
    assert_eq!(doc.text, "v2");
    assert_eq!(doc.version, 2);
}

#[test]
fn incremental_changes_return_new_text() {
    let store = DocumentStore::new();
    store.open(uri(), "int a;\nint b;".to_string(), 1);
    let change = TextDocumentContentChangeEvent {
        range: Some(Range::new(Position::new(1, 4), Position::new(1, 5))),
        range_length: None,
        text: "count".to_string(),
    };
    assert_eq!(store.apply_changes(&uri(), vec![change], 2).as_deref(), Some("int a;\nint count;"));
    assert_eq!(store.line(&uri(), 1).as_deref(), Some("int count;"));

    let unknown = Url::parse("file:///other.sp").unwrap();
    assert!(store.apply_changes(&unknown, Vec::new(), 1).is_none());
}
